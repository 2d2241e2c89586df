//! Holds the node type stored in the tree arena.
//!
//! Children are referred to by their position in the arena rather than by pointer, so dropping
//! or rebuilding a tree is a single `Vec` reset.

use std::fmt;

use crate::split::SplitRule;

///Position of a node in [`Tree::nodes`](crate::tree::Tree)
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Internal {
        rule: SplitRule,
        ///number of dataset indices under this node
        size: usize,
        left: NodeId,
        right: NodeId,
    },
    ///Terminal node owning the exact dataset indices it covers
    Leaf {
        indices: Vec<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {

    pub fn opposite(&self) -> Direction {

        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl Node {

    pub fn is_leaf(&self) -> bool {
        return matches!(self, Node::Leaf { .. });
    }

    ///Number of dataset indices in this subtree
    pub fn size(&self) -> usize {

        match self {
            Node::Internal { size, .. } => *size,
            Node::Leaf { indices } => indices.len(),
        }
    }

    pub fn child(&self, direction: Direction) -> Option<NodeId> {

        match (self, direction) {
            (Node::Internal { left, .. }, Direction::Left) => Some(*left),
            (Node::Internal { right, .. }, Direction::Right) => Some(*right),
            (Node::Leaf { .. }, _) => None,
        }
    }

    pub fn pretty(&self) -> String {
        return format!("{}", self);
    }
}

impl fmt::Display for Node {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Internal { rule: SplitRule::AxisAligned { dim, median }, size, left, right } => {
                write!(f, "NODE axis {} <= {} | size {} | L {} R {}", dim, median, size, left, right)
            },
            Node::Internal { rule: SplitRule::RandomProjection { median, delta, .. }, size, left, right } => {
                write!(f, "NODE proj <= {} | size {} | L {} R {}", median + delta, size, left, right)
            },
            Node::Leaf { indices } => {
                write!(f, "LEAF {:?}", indices)
            },
        }
    }
}
