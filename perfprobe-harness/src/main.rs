use clap::{Parser, ValueEnum};
use perfprobe_client::{BookQuery, Client};
use perfprobe_common::Result;
use perfprobe_harness::config::{Endpoint, ProbeConfig};
use perfprobe_harness::{logging, report, PerfHarness, StatisticsResult, Verdict};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EndpointArg {
    Books,
    Search,
}

#[derive(Parser)]
#[command(name = "perfprobe", about = "Concurrent latency probe for the catalogue API")]
struct Args {
    /// JSON config file; the flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the target, e.g. http://localhost:8443
    #[arg(long)]
    url: Option<String>,

    /// Catalogue call each attempt issues
    #[arg(long, value_enum)]
    endpoint: Option<EndpointArg>,

    /// Search keyword (search endpoint only)
    #[arg(long)]
    keyword: Option<String>,

    /// Comma-separated concurrency levels, e.g. 1,9,10,11
    #[arg(long, value_delimiter = ',')]
    concurrency: Option<Vec<usize>>,

    /// Rounds per concurrency level
    #[arg(long)]
    iterations: Option<usize>,

    /// Pause between concurrency levels (ms)
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Per-request timeout (ms)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Fail if mean latency exceeds this (ms)
    #[arg(long)]
    max_avg_ms: Option<f64>,

    /// Fail if p95 latency exceeds this (ms)
    #[arg(long)]
    max_p95_ms: Option<f64>,

    /// Fail if p99 latency exceeds this (ms)
    #[arg(long)]
    max_p99_ms: Option<f64>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Serialize)]
struct LevelReport<'a> {
    statistics: &'a StatisticsResult,
    verdict: &'a Verdict,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = build_config(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });

    logging::init_logging(args.verbose, args.quiet);

    let client = Client::new(config.client_config()).unwrap_or_else(|e| {
        eprintln!("Failed to build HTTP client: {e}");
        process::exit(3);
    });

    let harness = PerfHarness::new(config.harness_config());
    let levels = &config.concurrency_levels;

    let results = match config.endpoint {
        Endpoint::Books => {
            let query = BookQuery::default();
            let op = move || {
                let client = client.clone();
                let query = query.clone();
                async move { client.get_books(&query).await }
            };
            harness.sweep(op, levels, config.iterations).await
        }
        Endpoint::Search => {
            let keyword = config.keyword.clone();
            let op = move || {
                let client = client.clone();
                let keyword = keyword.clone();
                async move { client.search_books(&keyword).await }
            };
            harness.sweep(op, levels, config.iterations).await
        }
    };

    let results = results.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(3);
    });

    let verdicts: Vec<Verdict> = results.iter().map(|r| harness.validate(r, &config.thresholds)).collect();

    if args.json {
        let reports: Vec<LevelReport> = results
            .iter()
            .zip(&verdicts)
            .map(|(statistics, verdict)| LevelReport { statistics, verdict })
            .collect();
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialise results: {e}");
                process::exit(3);
            }
        }
    } else {
        print_report(&config, &results, &verdicts);
    }

    let all_passed = verdicts.iter().all(|v| v.passed);
    process::exit(if all_passed { 0 } else { 1 });
}

fn build_config(args: &Args) -> Result<ProbeConfig> {
    let mut config = match &args.config {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };

    if let Some(url) = &args.url {
        config.base_url = url.clone();
    }
    if let Some(endpoint) = args.endpoint {
        config.endpoint = match endpoint {
            EndpointArg::Books => Endpoint::Books,
            EndpointArg::Search => Endpoint::Search,
        };
    }
    if let Some(keyword) = &args.keyword {
        config.keyword = keyword.clone();
    }
    if let Some(levels) = &args.concurrency {
        config.concurrency_levels = levels.clone();
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(cooldown_ms) = args.cooldown_ms {
        config.cooldown_ms = cooldown_ms;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.request_timeout_ms = timeout_ms;
    }
    if args.max_avg_ms.is_some() {
        config.thresholds.max_avg_ms = args.max_avg_ms;
    }
    if args.max_p95_ms.is_some() {
        config.thresholds.max_p95_ms = args.max_p95_ms;
    }
    if args.max_p99_ms.is_some() {
        config.thresholds.max_p99_ms = args.max_p99_ms;
    }

    config.validate()?;
    Ok(config)
}

fn print_report(config: &ProbeConfig, results: &[StatisticsResult], verdicts: &[Verdict]) {
    println!("perfprobe results");
    println!("=================");
    println!("Target:                {}", config.base_url);
    println!("Endpoint:              {}", config.endpoint.as_name());
    println!("Iterations per level:  {}", config.iterations);
    println!();
    print!("{}", report::comparison_table(results));
    println!();

    for (result, verdict) in results.iter().zip(verdicts) {
        println!(
            "Concurrency {:<4} {}",
            result.concurrency,
            if verdict.passed { "PASS" } else { "FAIL" }
        );
        for line in report::format_verdict(verdict) {
            println!("    {line}");
        }
    }
    println!();

    let overall = verdicts.iter().all(|v| v.passed);
    println!("Result: {}", if overall { "PASS" } else { "FAIL" });
}
