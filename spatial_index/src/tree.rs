//! Implementation of tree creation and querying
//!
//! The same build and search code serves both the kd-tree and the rp-tree; only the
//! [`SplitStrategy`] handed to [`Tree::build`] differs.

use log::{debug, trace};
use rand::Rng;
use std::collections::VecDeque;

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::node::{Direction, Node, NodeId};
use crate::split::{SplitRule, SplitStrategy};
use crate::top_hits::{Neighbor, TopHits};
use crate::vector::Vector;

/// Binary space-partitioning tree over the positions of a [`Dataset`].
///
/// Nodes live in a flat arena. Leaves own the indices they cover; internal nodes only hold their
/// split rule. A tree does not own the dataset it indexes, so callers must pass the same dataset
/// it was built from to [`Tree::search`]; a dataset of a different length is rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    ///length of the dataset the tree was built over
    num_points: usize,
}

#[derive(Debug)]
enum NodeAction {
    Descend,
    ///sibling left behind on the way down
    CheckIgnoredBranch(Direction),
}

impl Tree {

    pub fn empty() -> Self {

        return Self {
            nodes: Vec::new(),
            root: None,
            num_points: 0,
        }
    }

    ///Builds a tree over every vector of `dataset`.
    ///
    ///A node with fewer than `leaf_size` indices becomes a leaf. So does a node whose split sends
    ///everything to one side. Nodes are processed breadth first, so a deterministic strategy
    ///always yields the same arena.
    pub fn build<R: Rng + ?Sized>(dataset: &Dataset, leaf_size: usize, strategy: SplitStrategy, rng: &mut R) -> Result<Self> {

        if leaf_size == 0 {
            return Err(Error::InvalidParameter("leaf size must be at least 1".to_string()));
        }

        let mut tree = Self::empty();

        if dataset.is_empty() {
            return Ok(tree);
        }

        let vectors = dataset.as_slice();
        let mut num_degenerate: usize = 0;

        tree.nodes.push(Node::Leaf { indices: Vec::new() });
        tree.root = Some(0);
        tree.num_points = dataset.len();

        let mut to_visit: VecDeque<(NodeId, Vec<usize>)> = VecDeque::new();
        to_visit.push_back((0, (0..dataset.len()).collect()));

        while let Some((id, indices)) = to_visit.pop_front() {

            if indices.len() < leaf_size {
                tree.nodes[id] = Node::Leaf { indices };
                continue;
            }

            let rule = strategy.choose_rule(dataset, &indices, rng)?;

            let mut left_indices: Vec<usize> = Vec::with_capacity((indices.len() / 2) + 1);
            let mut right_indices: Vec<usize> = Vec::with_capacity((indices.len() / 2) + 1);
            for &index in indices.iter() {
                match rule.goes_left(&vectors[index])? {
                    true => left_indices.push(index),
                    false => right_indices.push(index),
                }
            }

            if left_indices.is_empty() || right_indices.is_empty() {
                trace!("degenerate split at node {} over {} indices", id, indices.len());
                num_degenerate += 1;
                tree.nodes[id] = Node::Leaf { indices };
                continue;
            }

            let left = tree.nodes.len();
            tree.nodes.push(Node::Leaf { indices: Vec::new() });
            let right = tree.nodes.len();
            tree.nodes.push(Node::Leaf { indices: Vec::new() });

            tree.nodes[id] = Node::Internal {
                rule,
                size: indices.len(),
                left,
                right,
            };

            to_visit.push_back((left, left_indices));
            to_visit.push_back((right, right_indices));
        }

        debug!("built {:?} tree: {} points, {} nodes, {} leaves, depth {}, {} degenerate splits",
            strategy, dataset.len(), tree.num_nodes(), tree.num_leaves(), tree.depth(), num_degenerate);

        return Ok(tree);
    }

    pub fn nodes(&self) -> &[Node] {
        return &self.nodes;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        return self.nodes.get(id);
    }

    pub fn root(&self) -> Option<NodeId> {
        return self.root;
    }

    ///Number of dataset positions covered by the tree
    pub fn num_points(&self) -> usize {
        return self.num_points;
    }

    pub fn num_nodes(&self) -> usize {
        return self.nodes.len();
    }

    pub fn num_leaves(&self) -> usize {
        return self.nodes.iter().filter(|n| n.is_leaf()).count();
    }

    pub fn is_empty(&self) -> bool {
        return self.root.is_none();
    }

    ///Number of nodes on the longest root-to-leaf path, 0 for an empty tree
    pub fn depth(&self) -> usize {

        let mut max_depth = 0;
        let mut to_check: Vec<(NodeId, usize)> = Vec::new();

        if let Some(root) = self.root {
            to_check.push((root, 1));
        }

        while let Some((id, depth)) = to_check.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Internal { left, right, .. } = &self.nodes[id] {
                to_check.push((*left, depth + 1));
                to_check.push((*right, depth + 1));
            }
        }

        return max_depth;
    }

    ///Index lists of every leaf, left to right
    pub fn leaf_index_sets(&self) -> Vec<&[usize]> {

        let mut sets: Vec<&[usize]> = Vec::new();
        let mut to_check: Vec<NodeId> = Vec::new();

        if let Some(root) = self.root {
            to_check.push(root);
        }

        while let Some(id) = to_check.pop() {
            match &self.nodes[id] {
                Node::Leaf { indices } => sets.push(indices),
                Node::Internal { left, right, .. } => {
                    to_check.push(*right);
                    to_check.push(*left);
                },
            }
        }

        return sets;
    }

    ///Human-readable dump, one node per line, indented by depth
    pub fn output_depths(&self) -> String {

        let mut s = String::new();
        let mut to_check: Vec<(NodeId, usize)> = Vec::new();

        match self.root {
            None => {
                s += "EMPTY\n";
                return s;
            },
            Some(root) => to_check.push((root, 0)),
        }

        while let Some((id, depth)) = to_check.pop() {
            let node = &self.nodes[id];
            s += &format!("{}{}\n", "  ".repeat(depth), node);

            if let Node::Internal { left, right, .. } = node {
                to_check.push((*right, depth + 1));
                to_check.push((*left, depth + 1));
            }
        }

        return s;
    }

    ///Returns the `k` nearest neighbors of `query` among the vectors of `dataset`.
    ///
    ///Descends to the query's leaf, then unwinds the path. At each internal node on the way back
    ///the untaken sibling is searched only while fewer than `k` candidates are held or the
    ///splitting hyperplane is no farther than the worst candidate. Equality still visits, since a
    ///point on the hyperplane may tie the worst distance with a smaller index.
    pub fn search(&self, dataset: &Dataset, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {

        if k == 0 {
            return Err(Error::InvalidParameter("k must be at least 1".to_string()));
        }

        let root = match self.root {
            None => return Err(Error::EmptyIndex),
            Some(x) => x,
        };

        if dataset.len() != self.num_points {
            return Err(Error::InvalidParameter(format!(
                "tree was built over {} vectors, dataset holds {}", self.num_points, dataset.len())));
        }

        if let Some(dim) = dataset.dimension() {
            if dim != query.dimension() {
                return Err(Error::DimensionMismatch { left: query.dimension(), right: dim });
            }
        }

        let vectors = dataset.as_slice();
        let mut hits = TopHits::new(k);

        let mut num_nodes_visited: usize = 0;
        let mut num_leaves_visited: usize = 0;
        let mut num_branches_pruned: usize = 0;

        let mut nodes_to_check: Vec<(NodeId, NodeAction)> = vec![(root, NodeAction::Descend)];

        while let Some((id, action)) = nodes_to_check.pop() {

            match action {

                NodeAction::Descend => {

                    let mut curr = id;
                    loop {
                        match &self.nodes[curr] {
                            Node::Leaf { indices } => {
                                num_leaves_visited += 1;
                                for &index in indices {
                                    let distance = query.distance(&vectors[index])?;
                                    hits.try_add(index, distance);
                                }
                                break;
                            },
                            Node::Internal { rule, left, right, .. } => {
                                num_nodes_visited += 1;
                                match rule.goes_left(query)? {
                                    true => {
                                        nodes_to_check.push((curr, NodeAction::CheckIgnoredBranch(Direction::Right)));
                                        curr = *left;
                                    },
                                    false => {
                                        nodes_to_check.push((curr, NodeAction::CheckIgnoredBranch(Direction::Left)));
                                        curr = *right;
                                    },
                                }
                            },
                        }
                    }
                },

                NodeAction::CheckIgnoredBranch(direction) => {

                    let node = &self.nodes[id];
                    let (rule, sibling) = match (node, node.child(direction)) {
                        (Node::Internal { rule, .. }, Some(sibling)) => (rule, sibling),
                        _ => continue,
                    };

                    if must_visit(rule, query, &hits)? {
                        nodes_to_check.push((sibling, NodeAction::Descend));
                    } else {
                        num_branches_pruned += 1;
                    }
                },
            }
        }

        debug!("search k={}: {} internal nodes, {} leaves visited, {} branches pruned",
            k, num_nodes_visited, num_leaves_visited, num_branches_pruned);

        return Ok(hits.into_sorted_vec());
    }
}

fn must_visit(rule: &SplitRule, query: &Vector, hits: &TopHits) -> Result<bool> {

    if !hits.is_full() {
        return Ok(true);
    }

    let dist = rule.hyperplane_distance(query)?;
    return Ok(dist <= hits.worst_distance());
}
