mod config;
mod errors;
mod models;
mod state;
mod vectors;
mod verify;
mod wad;

use crate::config::{AppConfig, OutputFormat};
use crate::errors::EngineResult;
use crate::models::black_scholes::BlackScholesEngine;
use crate::vectors::emit;
use crate::vectors::generator::{self, ScenarioOutcome};
use crate::vectors::scenarios::{Scenario, PARITY_SCENARIOS, REPORT_SCENARIOS, VECTOR_SCENARIOS};
use crate::verify::parity::verify_parity;
use crate::verify::tolerance::ToleranceContract;
use std::io::{BufWriter, Write};

fn main() {
    // Logs go to stderr; stdout carries only the emitted vectors
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("wad_greeks starting");

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let engine = BlackScholesEngine::new(cfg.normal_provider.build());
    let reference = BlackScholesEngine::new(cfg.normal_provider.counterpart().build());
    tracing::info!(
        provider = engine.provider_name(),
        reference = reference.provider_name(),
        format = ?cfg.output_format,
        "engines ready"
    );

    let mut violations = run_parity_sweep(&engine, PARITY_SCENARIOS, cfg.parity_tolerance);
    violations += run_cross_check(&engine, &reference, VECTOR_SCENARIOS, &cfg.tolerance);

    let outcomes = generator::generate(&engine, VECTOR_SCENARIOS);
    violations += run_wad_self_check(&outcomes, &cfg.tolerance);

    if let Err(e) = emit_output(&cfg, &engine, &outcomes) {
        tracing::error!("output error: {e}");
        std::process::exit(1);
    }

    let skipped = outcomes.iter().filter(|o| o.vector.is_err()).count();
    tracing::info!(
        vectors = outcomes.len() - skipped,
        skipped = skipped,
        violations = violations,
        "run complete"
    );

    if violations > 0 {
        tracing::error!(violations = violations, "tolerance checks failed");
        std::process::exit(1);
    }
}

/// Put-call parity over the sweep table. Returns the number of failed checks.
fn run_parity_sweep(engine: &BlackScholesEngine, scenarios: &[Scenario], tolerance: f64) -> usize {
    let mut failures = 0;
    for s in scenarios {
        let inputs = s.inputs();
        let check = engine
            .price(&inputs)
            .and_then(|r| verify_parity(&inputs, &r, tolerance))
            .and_then(|c| c.into_result());

        match check {
            Ok(c) => tracing::info!(scenario = s.label, deviation = c.deviation, "parity ok"),
            Err(e) if e.is_scenario_local() => {
                tracing::warn!(scenario = s.label, error = %e, "parity skipped");
            }
            Err(e) => {
                failures += 1;
                tracing::error!(scenario = s.label, error = %e, "parity failed");
            }
        }
    }
    failures
}

/// Prices every scenario with both normal providers and holds the primary
/// to the tolerance contract. Returns the number of violations.
fn run_cross_check(
    engine: &BlackScholesEngine,
    reference: &BlackScholesEngine,
    scenarios: &[Scenario],
    contract: &ToleranceContract,
) -> usize {
    let mut failures = 0;
    for s in scenarios {
        let inputs = s.inputs();
        let (computed, expected) = match (engine.price(&inputs), reference.price(&inputs)) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(scenario = s.label, error = %e, "cross-check skipped");
                continue;
            }
        };

        let violations = contract.compare_results(&computed, &expected);
        for v in &violations {
            tracing::error!(scenario = s.label, error = %v, "cross-check failed");
        }
        if violations.is_empty() {
            tracing::debug!(scenario = s.label, "cross-check ok");
        }
        failures += violations.len();
    }
    failures
}

/// Decodes each emitted WAD price and checks it against the float it came
/// from, the same comparison the fixed-point suite makes.
fn run_wad_self_check(outcomes: &[ScenarioOutcome], contract: &ToleranceContract) -> usize {
    outcomes
        .iter()
        .filter_map(|o| o.vector.as_ref().ok())
        .map(|v| {
            let violations =
                contract.compare_scaled(v, v.expected_call_scaled, v.expected_put_scaled);
            for e in &violations {
                tracing::error!(scenario = v.label, error = %e, "WAD self-check failed");
            }
            violations.len()
        })
        .sum()
}

fn emit_output(
    cfg: &AppConfig,
    engine: &BlackScholesEngine,
    outcomes: &[ScenarioOutcome],
) -> EngineResult<()> {
    let mut out: Box<dyn Write> = match &cfg.output_path {
        Some(path) => {
            tracing::info!("writing output to {}", path.display());
            Box::new(BufWriter::new(std::fs::File::create(path)?))
        }
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };

    match cfg.output_format {
        OutputFormat::Move => emit::write_move(&mut out, outcomes)?,
        OutputFormat::Json => emit::write_json(&mut out, outcomes)?,
        OutputFormat::Report => emit::write_report(
            &mut out,
            engine,
            REPORT_SCENARIOS,
            PARITY_SCENARIOS,
            outcomes,
            cfg.parity_tolerance,
            &cfg.tolerance,
        )?,
    }

    out.flush()?;
    Ok(())
}
