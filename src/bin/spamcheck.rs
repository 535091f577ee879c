//! spamcheck — command-line front-end for the spam-scoring service
//!
//! Usage:
//!   spamcheck predict <message>            Score a single message
//!   spamcheck batch <file|->               Score one message per line
//!   spamcheck health                       Check service health
//!   spamcheck metrics                      Print the service's Prometheus metrics

use anyhow::Context;
use spamcheck::dispatch::{Command, Dispatcher, Outcome};
use spamcheck::{ClientConfig, SpamClient};
use std::io::Read;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = match args[1].as_str() {
        "predict" => match args.get(2..).filter(|rest| !rest.is_empty()) {
            Some(rest) => Command::AnalyzeMessage(rest.join(" ")),
            None => usage_error("predict needs a message"),
        },
        "batch" => match args.get(2) {
            Some(source) => match read_source(source) {
                Ok(text) => Command::AnalyzeBatch(text),
                Err(e) => fail(e),
            },
            None => usage_error("batch needs a file path or '-' for stdin"),
        },
        "health" => Command::CheckHealth,
        "metrics" => Command::FetchMetrics,
        "version" | "--version" | "-V" => {
            println!("spamcheck {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        other => usage_error(&format!("Unknown command: {other}")),
    };

    if let Err(e) = run(command).await {
        fail(e);
    }
}

fn print_usage() {
    println!(
        r#"spamcheck — spam-scoring service client

USAGE:
    spamcheck <COMMAND> [ARGS]

COMMANDS:
    predict <message>       Score a single message
    batch <file|->          Score one message per line (from a file or stdin)
    health                  Check service health
    metrics                 Print the service's Prometheus metrics
    version                 Show version information
    help                    Show this help message

ENVIRONMENT:
    SPAMCHECK_CONFIG                YAML config file
    SPAMCHECK_BASE_URL              Service base URL (default http://127.0.0.1:5000)
    SPAMCHECK_HTTP_TIMEOUT_SECS     Per-request timeout
    SPAMCHECK_BATCH_CHUNK_SIZE      Messages per chunk / max concurrent requests
    RUST_LOG                        Log filter (e.g. spamcheck=debug)"#
    );
}

fn usage_error(message: &str) -> ! {
    eprintln!("{message}");
    eprintln!();
    print_usage();
    std::process::exit(1);
}

fn fail(e: anyhow::Error) -> ! {
    eprintln!("Error: {e:#}");
    std::process::exit(1);
}

fn read_source(source: &str) -> anyhow::Result<String> {
    let mut text = String::new();
    if source == "-" {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
    } else {
        text = std::fs::read_to_string(source).with_context(|| format!("reading {source}"))?;
    }
    Ok(text)
}

fn load_config() -> anyhow::Result<ClientConfig> {
    let config = match std::env::var("SPAMCHECK_CONFIG") {
        Ok(path) => ClientConfig::load(&path).with_context(|| format!("loading {path}"))?,
        Err(_) => ClientConfig::from_env()?,
    };
    Ok(config)
}

async fn run(command: Command) -> anyhow::Result<()> {
    let client = SpamClient::builder().config(load_config()?).build()?;
    let dispatcher = Dispatcher::new(Arc::new(client));

    let outcome = dispatcher
        .dispatch(command, |p| eprintln!("Processing... {p}"))
        .await?;

    match outcome {
        Outcome::Analysis(analysis) => {
            let r = &analysis.result;
            println!(
                "{} (confidence {}%, {} ms)",
                r.prediction,
                r.confidence_percent(),
                analysis.elapsed.as_millis()
            );
        }
        Outcome::Batch(report) => {
            let s = &report.summary;
            println!(
                "Processed {} messages: {} spam, {} ham ({:.1}% spam)",
                s.total,
                s.spam,
                s.ham,
                s.spam_rate() * 100.0
            );
            for (i, r) in report.results.iter().enumerate() {
                println!(
                    "{:>4}  {:<8}  {:>3}%  {}",
                    i + 1,
                    r.prediction,
                    r.confidence_percent(),
                    r.text
                );
            }
        }
        Outcome::Health(status) => {
            println!("{}", status.status);
            if !status.is_healthy() {
                std::process::exit(2);
            }
        }
        Outcome::Metrics(text) => print!("{text}"),
        Outcome::FeedbackRecorded(event) => println!("feedback {} recorded", event.event_id),
    }
    Ok(())
}
