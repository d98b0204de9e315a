//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the real entry point that:
//! - installs logging and reads the environment settings
//! - parses CLI arguments
//! - runs the matching pipeline
//! - prints reports (text or JSON)

use clap::Parser;

use crate::cli::{Cli, Command, EdaArgs, FetchArgs, MergeArgs, ModelArgs, ServeArgs};
use crate::config::Settings;
use crate::context::{RunContext, init_tracing};
use crate::domain::DateRange;
use crate::error::AppError;
use crate::report::{self, EdaReport};

pub mod pipeline;

/// Entry point for the `brent` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_tracing();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Fetch(args) => handle_fetch(&settings, args),
        Command::Eda(args) => handle_eda(args),
        Command::Model(args) => handle_model(args),
        Command::Merge(args) => handle_merge(&settings, args),
        Command::Serve(args) => handle_serve(&settings, args),
    }
}

fn handle_fetch(settings: &Settings, args: FetchArgs) -> Result<(), AppError> {
    let ctx = RunContext::new("fetch");
    let range = DateRange::new(args.start, args.end)?;
    let table = pipeline::run_fetch(settings, range, &args.output, &ctx)?;
    println!("{}", report::format_fetch_summary(&table, &args.output));
    Ok(())
}

fn handle_eda(args: EdaArgs) -> Result<(), AppError> {
    let ctx = RunContext::new("eda");
    let series = pipeline::load_series(&args.prices, &ctx)?;
    let config = pipeline::EdaConfig {
        period: args.period,
        nlags: args.nlags,
        chart: (!args.no_plot && !args.json).then_some((args.width, args.height)),
        plot_dir: args.plot_dir.clone(),
    };
    let out = pipeline::run_eda(&series, &config, &ctx)?;

    if args.json {
        let report = EdaReport {
            summary: out.summary,
            period: args.period,
            decomposed: out.decomposition.is_some(),
            acf: out.acf,
            pacf: out.pacf,
        };
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    println!("{}", report::format_summary(&out.summary));
    if let Some(chart) = &out.price_chart {
        println!("{chart}");
    }
    if let Some(decomposition) = &out.decomposition {
        println!("{}", report::format_decomposition(decomposition));
    }
    if let Some(chart) = &out.decomposition_chart {
        println!("{chart}");
    }
    if let (Some(acf), Some(pacf)) = (&out.acf, &out.pacf) {
        println!("{}", report::format_acf(acf, pacf));
    }
    Ok(())
}

fn handle_model(args: ModelArgs) -> Result<(), AppError> {
    let ctx = RunContext::new("model");
    let series = pipeline::load_series(&args.prices, &ctx)?;
    let out = pipeline::run_model(&series, args.train_size, &ctx)?;

    if args.json {
        println!("{}", to_json(&out)?);
        return Ok(());
    }

    println!("{}", report::format_split(out.train_size, out.test_size));
    println!("{}", report::format_adf("train prices", &out.adf_levels));
    println!("{}", report::format_adf("train price differences", &out.adf_differences));
    println!("{}", report::format_baselines(&out.baselines));
    Ok(())
}

fn handle_merge(settings: &Settings, args: MergeArgs) -> Result<(), AppError> {
    let ctx = RunContext::new("merge");
    let source = if args.fetch {
        pipeline::IndicatorSource::Fetch(settings.clone())
    } else {
        pipeline::IndicatorSource::File(args.indicators.clone())
    };
    let merged = pipeline::run_merge(&args.prices, &source, &args.output, &ctx)?;
    println!(
        "Merged {} rows with {} indicator columns into {}",
        merged.rows.len(),
        merged.labels.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_serve(settings: &Settings, args: ServeArgs) -> Result<(), AppError> {
    let ctx = RunContext::new("serve");
    let addr = args.addr.unwrap_or(settings.server_addr);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Server(format!("Failed to start runtime: {e}")))?;
    runtime.block_on(crate::server::serve(&args.data, addr, &ctx))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::InvalidInput(format!("JSON encoding failed: {e}")))
}
