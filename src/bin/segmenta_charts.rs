//! segmenta-charts: inspect saved chart output.
//!
//! ## Usage
//! - `segmenta-charts --list`           list saved chart names
//! - `segmenta-charts --view NAME`      print the HTML path for a chart
//! - `segmenta-charts --preview NAME`   render a chart as text bars
//!
//! ## Configuration
//! - SEGMENTA_CONFIG: path to the YAML config file (default: config.yaml)
//! - CHART_DIR: overrides the configured chart directory
//! - RUST_LOG: log filter (default: info)

use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use segmenta::charts::{ascii_preview, FileChartSink};
use segmenta::config::Config;

const USAGE: &str = "usage: segmenta-charts --list | --view NAME | --preview NAME";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let sink = FileChartSink::new(&config.charts.dir);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("--list") => {
            for name in sink.list()? {
                println!("{name}");
            }
        }
        Some("--view") => {
            let name = args.get(1).ok_or(USAGE)?;
            let chart = sink.load(name)?;
            println!("{}", sink.html_path(name).display());
            println!("kind: {}", chart.kind);
            println!("rows: {}", chart.table.rows.len());
        }
        Some("--preview") => {
            let name = args.get(1).ok_or(USAGE)?;
            let chart = sink.load(name)?;
            print!("{}", ascii_preview(&chart));
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }

    Ok(())
}
