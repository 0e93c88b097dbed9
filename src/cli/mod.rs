//! Prediksi CLI
//!
//! Command-line interface for serving the form, one-off predictions, and
//! dataset inspection.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{load_dataframe, select_columns};
use crate::inference::{InferenceConfig, InferenceEngine};
use crate::schema::{FormSchema, InputRecord};
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn line_box_top() {
    println!("  {}", dim("┌─────────────────────────────────────────────────────────┐"));
}
fn line_box_bottom() {
    println!("  {}", dim("└─────────────────────────────────────────────────────────┘"));
}

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).len();
    let pad = if visible_len < W { W - visible_len } else { 0 };
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).len();
    let total_pad = if visible_len < W { W - visible_len } else { 0 };
    let left = total_pad / 2;
    let right = total_pad - left;
    println!(
        "  {}  {}{}{} {}",
        dim("│"),
        " ".repeat(left),
        content,
        " ".repeat(right),
        dim("│")
    );
}

fn line_box_empty() {
    line_box("");
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
            continue;
        }
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "prediksi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tabular form prediction service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the form UI and API server
    Serve {
        /// Server host
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Server port
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Reference dataset (CSV or JSON)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Classifier artifact file
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Form variant (ride-fare, delivery-feedback)
        #[arg(long)]
        variant: Option<String>,
    },

    /// Classify a record or a whole file
    Predict {
        /// Reference dataset the pipeline is fitted on
        #[arg(short, long)]
        data: PathBuf,

        /// Classifier artifact file
        #[arg(short, long)]
        model: PathBuf,

        /// Form variant (ride-fare, delivery-feedback)
        #[arg(long, default_value = "delivery-feedback")]
        variant: String,

        /// JSON file holding one record (field name to value)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// CSV file of records to classify in bulk
        #[arg(short, long)]
        batch: Option<PathBuf>,

        /// Output CSV for batch predictions
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show reference dataset information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: &str,
    port: u16,
    data: Option<PathBuf>,
    model: Option<PathBuf>,
    variant: Option<String>,
) -> anyhow::Result<()> {
    let mut config = ServerConfig {
        host: host.to_string(),
        port,
        ..Default::default()
    };
    if let Some(data) = data {
        config.data_path = data;
    }
    if let Some(model) = model {
        config.model_path = model;
    }
    if let Some(variant) = variant {
        config.variant = variant;
    }

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Prediksi".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box(&kv("Form UI", &format!("http://{}:{}", config.host, config.port)));
    line_box(&kv("API    ", &format!("http://{}:{}/api", config.host, config.port)));
    line_box(&kv("Variant", &config.variant));
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

pub fn cmd_predict(
    data_path: &Path,
    model_path: &Path,
    variant: &str,
    input: Option<&Path>,
    batch: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Predict");

    let schema = FormSchema::by_name(variant)
        .ok_or_else(|| anyhow::anyhow!("Unknown variant: {variant}"))?;

    step_run("Fitting pipeline");
    let start = Instant::now();
    let engine = InferenceEngine::from_paths(
        InferenceConfig::default(),
        data_path,
        model_path,
        &schema,
    )?;
    step_done(&format!("{:?}", start.elapsed()));

    match (input, batch) {
        (Some(input_path), _) => {
            let json = std::fs::read_to_string(input_path)?;
            let record: InputRecord = serde_json::from_str(&json)?;

            let prediction = engine.predict_record(&record)?;
            println!();
            println!(
                "  {:<16} {}",
                muted("Prediction"),
                prediction.label.white().bold()
            );
            println!();
        }
        (None, Some(batch_path)) => {
            step_run("Loading records");
            let df = load_dataframe(batch_path)?;
            let features = select_columns(&df, &schema.field_names())?;
            step_done(&format!("{} rows", features.height()));

            step_run("Classifying");
            let start = Instant::now();
            let labels = engine.predict_frame(&features)?;
            step_done(&format!("{:?}", start.elapsed()));

            if let Some(output_path) = output {
                let mut result = df.clone();
                result.with_column(Series::new("prediction".into(), labels))?;
                let mut file = std::fs::File::create(output_path)?;
                CsvWriter::new(&mut file).finish(&mut result)?;
                println!();
                println!(
                    "  {:<16} {}",
                    muted("Saved"),
                    output_path.display().to_string().white()
                );
            } else {
                println!();
                for (i, label) in labels.iter().take(10).enumerate() {
                    println!("  {:<6} {}", muted(&format!("{i}")), label.white());
                }
                if labels.len() > 10 {
                    println!("  {}", dim(&format!("... {} more", labels.len() - 10)));
                }
            }
            println!();
        }
        (None, None) => {
            anyhow::bail!("Provide --input <record.json> or --batch <records.csv>");
        }
    }

    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let df = load_dataframe(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!(
        "  {:<12} {:.2} MB",
        muted("Memory"),
        df.estimated_size() as f64 / 1024.0 / 1024.0
    );
    println!();

    println!(
        "  {:<28} {:<12} {:>6} {:>8}",
        muted("Column"),
        muted("Type"),
        muted("Nulls"),
        muted("Unique")
    );
    println!("  {}", dim(&"─".repeat(58)));

    for col in df.get_columns() {
        println!(
            "  {:<28} {:<12} {:>6} {:>8}",
            col.name(),
            format!("{:?}", col.dtype()).truecolor(140, 140, 140),
            col.null_count(),
            col.n_unique().unwrap_or(0)
        );
    }

    println!();
    Ok(())
}
