//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging
//! - builds the price source (BPS WebAPI or synthetic sample)
//! - runs prediction / history / debug
//! - prints reports/plots and writes optional exports

use clap::Parser;

use crate::cli::{Cli, Command, DebugArgs, HistoryArgs, PredictArgs, SourceArgs};
use crate::data::{BpsClient, PriceSource, SampleSource};
use crate::domain::PredictionPolicy;
use crate::error::AppError;
use crate::io::decode::KeyDecoder;

pub mod pipeline;

/// Entry point for the `rice` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dispatch(cli)
}

/// Run one parsed command.
///
/// Prediction targets are validated before the source is built, so a rejected
/// request needs neither an API key nor a network call.
pub fn dispatch(cli: Cli) -> Result<(), AppError> {
    if let Command::Predict(args) = &cli.command {
        crate::fit::validate_target(args.target(), &args.policy())?;
    }

    let source = build_source(&cli.source)?;
    let decoder = cli.source.decoder.decoder();
    log::debug!("source: {} | decoder: {}", source.describe(), decoder.name());

    match cli.command {
        Command::Predict(args) => handle_predict(&args, source.as_ref(), decoder.as_ref()),
        Command::History(args) => handle_history(&args, source.as_ref(), decoder.as_ref()),
        Command::Debug(args) => handle_debug(&args, source.as_ref(), decoder.as_ref()),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default `warn` level.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

pub fn build_source(args: &SourceArgs) -> Result<Box<dyn PriceSource>, AppError> {
    if args.offline {
        Ok(Box::new(SampleSource::with_seed(args.seed)))
    } else {
        Ok(Box::new(BpsClient::from_env()?))
    }
}

fn handle_predict(args: &PredictArgs, source: &dyn PriceSource, decoder: &dyn KeyDecoder) -> Result<(), AppError> {
    let policy = args.policy();
    let run = pipeline::run_predict(source, decoder, args.target(), &policy)?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.result)
            .map_err(|e| AppError::Io(format!("Failed to serialize prediction: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_run_summary(&run.source, &run.extraction));
        println!("{}", crate::report::format_prediction(&run.result, &policy));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_prediction_json(path, &run.result)?;
    }

    Ok(())
}

fn handle_history(args: &HistoryArgs, source: &dyn PriceSource, decoder: &dyn KeyDecoder) -> Result<(), AppError> {
    let run = pipeline::run_history(source, decoder, &args.window())?;

    if args.json {
        let json = serde_json::to_string_pretty(&run.history)
            .map_err(|e| AppError::Io(format!("Failed to serialize history: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_run_summary(&run.source, &run.extraction));
        println!("{}", crate::report::format_history_table(&run.history));
    }

    if args.plot {
        println!("{}", crate::plot::render_history_plot(&run.history, args.width, args.height));
    }

    if let Some(path) = &args.export {
        crate::io::export::write_history_csv(path, &run.history)?;
    }

    Ok(())
}

fn handle_debug(args: &DebugArgs, source: &dyn PriceSource, decoder: &dyn KeyDecoder) -> Result<(), AppError> {
    let extraction = pipeline::load_series(source, decoder)?;
    let description = source.describe();
    let policy = PredictionPolicy::default();
    let ctx = crate::debug::DebugContext {
        source: &description,
        decoder: decoder.name(),
        policy: &policy,
    };

    let path = crate::debug::write_debug_bundle(&args.dir, &ctx, &extraction)?;
    println!("Wrote debug bundle: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn early_target_is_rejected_before_the_online_source() {
        let err = dispatch(parse(&["rice", "predict", "--year", "2023", "--month", "6"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[test]
    fn oversized_degree_is_rejected_before_the_online_source() {
        let err = dispatch(parse(&["rice", "predict", "-y", "2025", "-m", "3", "--degree", "18446744073709551615"]))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }

    #[test]
    fn offline_prediction_runs() {
        dispatch(parse(&["rice", "--offline", "predict", "-y", "2025", "-m", "3", "--json"])).unwrap();
    }
}
