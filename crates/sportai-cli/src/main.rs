//! `sportai` command-line driver.
//!
//! ```text
//! sportai analyze <result.json> [--config cfg.json] [--metrics]
//! sportai schema
//! sportai smooth <samples.json> [--config cfg.json]
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use metrics_exporter_prometheus::PrometheusBuilder;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sportai_models::{AnalysisResult, BounceKind, JointSample};
use sportai_motion::{
    build_overlay, load_result, metric_sets, rank_all_metrics, EventTimeline, Metric, MotionConfig,
    MotionPipeline, RankMap,
};

const USAGE: &str = "usage:
  sportai analyze <result.json> [--config cfg.json] [--metrics]
  sportai schema
  sportai smooth <samples.json> [--config cfg.json]";

#[derive(Debug, PartialEq)]
enum Command {
    Analyze {
        input: PathBuf,
        config: Option<PathBuf>,
        metrics: bool,
    },
    Schema,
    Smooth {
        input: PathBuf,
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct AnalyzeReport<'a> {
    timeline: &'a EventTimeline,
    kind_counts: BTreeMap<BounceKind, usize>,
    rankings: BTreeMap<Metric, RankMap>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Analyze {
            input,
            config,
            metrics,
        } => analyze(&input, config.as_deref(), metrics),
        Command::Schema => {
            let schema = schemars::schema_for!(AnalysisResult);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::Smooth { input, config } => smooth(&input, config.as_deref()),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("sportai=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let (sub, rest) = args.split_first().ok_or_else(|| anyhow!(USAGE))?;

    let mut input = None;
    let mut config = None;
    let mut metrics = false;
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a path"))?;
                config = Some(PathBuf::from(path));
            }
            "--metrics" => metrics = true,
            flag if flag.starts_with("--") => return Err(anyhow!("unknown flag {}\n{}", flag, USAGE)),
            positional if input.is_none() => input = Some(PathBuf::from(positional)),
            extra => return Err(anyhow!("unexpected argument {}\n{}", extra, USAGE)),
        }
    }

    let require_input =
        |input: Option<PathBuf>| input.ok_or_else(|| anyhow!("{} requires an input file\n{}", sub, USAGE));

    match sub.as_str() {
        "analyze" => Ok(Command::Analyze {
            input: require_input(input)?,
            config,
            metrics,
        }),
        "smooth" => Ok(Command::Smooth {
            input: require_input(input)?,
            config,
        }),
        "schema" => Ok(Command::Schema),
        other => Err(anyhow!("unknown command {}\n{}", other, USAGE)),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MotionConfig> {
    let config = match path {
        Some(path) => MotionConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MotionConfig::from_env(),
    };
    config.validate()?;
    Ok(config)
}

fn analyze(input: &Path, config: Option<&Path>, with_metrics: bool) -> anyhow::Result<()> {
    let handle = if with_metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| anyhow!("failed to install metrics recorder: {}", e))?,
        )
    } else {
        None
    };

    let config = load_config(config)?;
    let result =
        load_result(input).with_context(|| format!("loading {}", input.display()))?;
    info!(
        positions = result.ball_positions.len(),
        players = result.players.len(),
        rallies = result.rallies.len(),
        "Loaded analysis result"
    );

    let timeline = MotionPipeline::new(config.bounce).run(&result);
    let report = AnalyzeReport {
        kind_counts: timeline.kind_counts(),
        rankings: rank_all_metrics(&metric_sets(&result)),
        timeline: &timeline,
    };
    let rendered = handle.map(|h| h.render());
    emit_report(
        &serde_json::to_string_pretty(&report)?,
        rendered.as_deref(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    )?;
    Ok(())
}

/// The report goes to `out` as a single JSON document; metrics go to `diag`.
fn emit_report(
    report: &str,
    metrics: Option<&str>,
    out: &mut impl Write,
    diag: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(out, "{}", report)?;
    if let Some(metrics) = metrics {
        writeln!(diag, "{}", metrics)?;
    }
    Ok(())
}

fn smooth(input: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let samples: Vec<JointSample> = serde_json::from_str(&raw)?;

    let overlay = build_overlay(&samples, &config.trajectory);
    info!(
        samples = samples.len(),
        points = overlay.path.len(),
        "Smoothed joint samples"
    );
    println!("{}", serde_json::to_string_pretty(&overlay)?);
    Ok(())
}
