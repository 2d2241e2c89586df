use spatial_index::{linear, Dataset, IndexConfig, Neighbor, SpatialIndex, SplitStrategy};

use kdam::tqdm;
use log::info;
use serde_json::json;
use std::error::Error;
use std::time::Instant;

use clap::Parser;
#[derive(Parser, Debug)] #[command(author, version, about, long_about = None)]
struct Args {

    //Dataset file, one comma-separated vector per line
    #[arg(short, long)]
    dataset: String,

    //Query file in the same format
    #[arg(short, long)]
    queries: String,

    //Which index to query: kd, rp or linear
    #[arg(short, long)]
    method: Option<String>,

    //Number of neighbors per query
    #[arg(short, default_value_t = 4)]
    k: usize,

    //How many queries from the query file to run, all of them if absent
    #[arg(short, long)]
    num_queries: Option<usize>,

    //Leaf size threshold, overrides the config file
    #[arg(short, long)]
    leaf_size: Option<usize>,

    //Seed for random-projection splits, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    //YAML index config
    #[arg(short, long)]
    config: Option<String>,

    //Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Method {
    Tree(SplitStrategy),
    Linear,
}

fn main() {

    env_logger::init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn parse_method(name: &str) -> Result<Method, String> {

    match name {
        "kd" => Ok(Method::Tree(SplitStrategy::AxisAlignedMedian)),
        "rp" => Ok(Method::Tree(SplitStrategy::RandomProjectionMedian)),
        "linear" => Ok(Method::Linear),
        _ => Err(format!("unknown method: {} (expected kd, rp or linear)", name)),
    }
}

fn load_config(args: &Args) -> Result<IndexConfig, Box<dyn Error>> {

    let mut config = match &args.config {
        Some(filename) => IndexConfig::from_file(filename)?,
        None => IndexConfig::default(),
    };

    if let Some(leaf_size) = args.leaf_size {
        config.leaf_size = leaf_size;
    }

    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    return Ok(config);
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {

    let mut config = load_config(&args)?;

    let method = match &args.method {
        Some(name) => parse_method(name)?,
        None => Method::Tree(config.strategy),
    };

    info!("reading dataset {}", &args.dataset);
    let dataset = Dataset::read_from_file(&args.dataset)?;
    info!("read {} vectors of dimension {:?}", dataset.len(), dataset.dimension());

    let queries = Dataset::read_from_file(&args.queries)?;

    let num_queries = args.num_queries.unwrap_or(queries.len());
    if num_queries > queries.len() {
        return Err(format!("asked for {} queries but {} only holds {}", num_queries, &args.queries, queries.len()).into());
    }

    let index = match method {
        Method::Tree(strategy) => {
            config.strategy = strategy;

            let start = Instant::now();
            let mut index = SpatialIndex::with_config(config)?;
            index.add_data(dataset.iter().cloned())?;
            info!("built {:?} tree with {} nodes in {:.3}s", strategy, index.tree().num_nodes(), start.elapsed().as_secs_f64());

            Some(index)
        },
        Method::Linear => None,
    };

    let mut results: Vec<Vec<Neighbor>> = Vec::with_capacity(num_queries);

    let start = Instant::now();
    for i in tqdm!(0..num_queries) {
        let query = &queries.as_slice()[i];

        let hits = match &index {
            Some(index) => index.search(query, args.k)?,
            None => linear::k_nearest_neighbors(&dataset, query, args.k)?,
        };
        results.push(hits);
    }
    let elapsed = start.elapsed();

    info!("{} queries with k={} took {} ms ({:?})", num_queries, args.k, elapsed.as_millis(), method);

    match args.json {
        true => {
            let output: Vec<_> = results.iter().enumerate()
                .map(|(i, hits)| json!({"query": i, "neighbors": hits}))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        },
        false => {
            for (i, hits) in results.iter().enumerate() {
                println!("Query {}: {}", i + 1, &queries.as_slice()[i]);
                for (rank, hit) in hits.iter().enumerate() {
                    println!("  Neighbor {}: Index = {} Distance = {}", rank + 1, hit.index, hit.distance);
                }
            }
            println!("Nearest neighbour search took: {} ms", elapsed.as_millis());
        },
    }

    Ok(())
}
