//! fraudnet-runner: headless generator and graph loader.
//!
//! Usage:
//!   fraudnet-runner generate --seed 42 --out ./data [--config gen.json]
//!   fraudnet-runner load --data ./data [--batch-size 1000] [--retries 2] [--all-pairs] [--reset]
//!   fraudnet-runner run --seed 42 --out ./data
//!   fraudnet-runner summary
//!
//! Store settings come from GRAPH_STORE_URI, GRAPH_STORE_USER and
//! GRAPH_STORE_PASSWORD, optionally via a .env file.

use anyhow::{bail, Context, Result};
use fraudnet_core::{
    config::{GeneratorConfig, InferenceStrategy, LoaderConfig, StoreConfig},
    dataset::GenerationSummary,
    loader::GraphLoader,
    report::LoadReport,
    store::GraphStore,
    synthesizer::Synthesizer,
};
use std::env;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("run");

    match command {
        "generate" => {
            generate(&args)?;
        }
        "load" => {
            load(&args, flag_value(&args, "--data").unwrap_or("./data"))?;
        }
        "run" => {
            generate(&args)?;
            let out = flag_value(&args, "--out").unwrap_or("./data");
            load(&args, out)?;
        }
        "summary" => {
            let store = GraphStore::connect(&StoreConfig::from_env()?)?;
            print_graph_summary(&store)?;
        }
        other => bail!("unknown command {other:?}; expected generate, load, run or summary"),
    }
    Ok(())
}

fn generate(args: &[String]) -> Result<GenerationSummary> {
    let seed = parse_arg(args, "--seed", 42u64);
    let out = flag_value(args, "--out").unwrap_or("./data");
    let config = match flag_value(args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    }
    .with_seed(seed);

    println!("fraudnet-runner generate");
    println!("  seed:      {seed}");
    println!("  as of:     {}", config.reference_date);
    println!("  out:       {out}");
    println!();

    let dataset = Synthesizer::new(config)?.run()?;
    dataset
        .check_integrity()
        .context("generated dataset failed its integrity check")?;
    let summary = dataset.write_tables(out)?;

    println!("=== GENERATION SUMMARY ===");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(summary)
}

/// Load `data_dir` into the configured store, resetting and starting over
/// on transient failures, then print the load report and graph summary.
fn load(args: &[String], data_dir: &str) -> Result<LoadReport> {
    let batch_size = parse_arg(args, "--batch-size", 1000usize);
    let retries = parse_arg(args, "--retries", 2u32);
    let inference = if args.iter().any(|a| a == "--all-pairs") {
        InferenceStrategy::AllPairs
    } else {
        InferenceStrategy::GroupBy
    };
    let store_config = StoreConfig::from_env()?;
    let mut store = GraphStore::connect(&store_config)?;
    if args.iter().any(|a| a == "--reset") {
        store.reset()?;
    }

    let mut attempt = 0;
    loop {
        let mut config = LoaderConfig::new(data_dir).with_batch_size(batch_size);
        config.inference = inference;
        let mut loader = GraphLoader::new(config, &mut store);
        match loader.run() {
            Ok(report) => {
                println!("{report}");
                print_graph_summary(&store)?;
                return Ok(report);
            }
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                log::warn!("load failed ({e}); resetting store, attempt {attempt} of {retries}");
                store.reset()?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_graph_summary(store: &GraphStore) -> Result<()> {
    println!();
    println!("=== GRAPH SUMMARY ===");
    println!("{}", store.graph_summary()?);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
