use crate::errors::EngineResult;
use crate::models::black_scholes::BlackScholesEngine;
use crate::state::PricingResult;
use crate::verify::parity::{check_parity, verify_parity};
use crate::verify::tolerance::ToleranceContract;
use crate::vectors::generator::{ReferenceVector, ScenarioOutcome};
use crate::vectors::scenarios::Scenario;
use crate::wad::{to_scaled, WAD};
use std::io::Write;

const RULE: &str = "============================================================";

fn write_banner(out: &mut impl Write, title: &str) -> EngineResult<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")?;
    Ok(())
}

/// Move-style `let` bindings, one block per scenario in declaration order.
pub fn write_move(out: &mut impl Write, outcomes: &[ScenarioOutcome]) -> EngineResult<()> {
    writeln!(out, "const SCALE: u256 = {};", group_digits(WAD))?;
    writeln!(out)?;

    for outcome in outcomes {
        let s = &outcome.scenario;
        writeln!(
            out,
            "// {}: S={}, K={}, T={:?}, r={:?}%, σ={:?}%",
            s.label,
            s.spot,
            s.strike,
            s.time,
            s.rate * 100.0,
            s.volatility * 100.0
        )?;
        match &outcome.vector {
            Ok(v) => write_move_vector(out, s, v)?,
            Err(e) => writeln!(out, "// skipped: {e}")?,
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_move_vector(out: &mut impl Write, s: &Scenario, v: &ReferenceVector) -> EngineResult<()> {
    writeln!(out, "// Call = {:.6}, Put = {:.6}", v.result.call_price, v.result.put_price)?;
    writeln!(out, "let spot = {} * SCALE;", s.spot)?;
    writeln!(out, "let strike = {} * SCALE;", s.strike)?;
    writeln!(out, "let time = {}; // {:?}", v.time_scaled, s.time)?;
    writeln!(out, "let rate = {}; // {:?}%", v.rate_scaled, s.rate * 100.0)?;
    writeln!(out, "let vol = {}; // {:?}%", v.vol_scaled, s.volatility * 100.0)?;
    writeln!(out, "// Expected call: {}", v.expected_call_scaled)?;
    writeln!(out, "// Expected put:  {}", v.expected_put_scaled)?;
    Ok(())
}

#[derive(serde::Serialize)]
#[serde(untagged)]
enum JsonEntry<'a> {
    Vector(&'a ReferenceVector),
    Failed { label: &'static str, error: String },
}

/// Pretty-printed JSON array, one entry per scenario.
pub fn write_json(out: &mut impl Write, outcomes: &[ScenarioOutcome]) -> EngineResult<()> {
    let entries: Vec<JsonEntry<'_>> = outcomes
        .iter()
        .map(|o| match &o.vector {
            Ok(v) => JsonEntry::Vector(v),
            Err(e) => JsonEntry::Failed {
                label: o.scenario.label,
                error: e.to_string(),
            },
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &entries)?;
    writeln!(out)?;
    Ok(())
}

/// Full human-readable report: per-scenario detail, parity sweep, vectors, summary.
pub fn write_report(
    out: &mut impl Write,
    engine: &BlackScholesEngine,
    report_scenarios: &[Scenario],
    parity_scenarios: &[Scenario],
    outcomes: &[ScenarioOutcome],
    parity_tolerance: f64,
    contract: &ToleranceContract,
) -> EngineResult<()> {
    writeln!(out, "Black-Scholes Reference Implementation")?;
    writeln!(out, "Normal CDF/PDF provider: {}", engine.provider_name())?;
    writeln!(out)?;

    for s in report_scenarios {
        write_banner(
            out,
            &format!(
                "TEST: {} (S={}, K={}, T={:?}, r={:?}%, σ={:?}%)",
                s.label,
                s.spot,
                s.strike,
                s.time,
                s.rate * 100.0,
                s.volatility * 100.0
            ),
        )?;
        let inputs = s.inputs();
        match engine.price(&inputs) {
            Ok(r) => write_scenario_detail(out, s, &r, parity_tolerance)?,
            Err(e) => writeln!(out, "\nerror: {e}")?,
        }
        writeln!(out)?;
    }

    write_banner(out, "PUT-CALL PARITY VERIFICATION")?;
    for s in parity_scenarios {
        let mark = match check_parity(engine, &s.inputs()) {
            Ok(true) => "✓",
            _ => "✗",
        };
        writeln!(
            out,
            "{mark} S={}, K={}, T={:?}, r={:?}, σ={:?}",
            s.spot, s.strike, s.time, s.rate, s.volatility
        )?;
    }
    writeln!(out)?;

    write_banner(out, "MOVE TEST VECTORS")?;
    writeln!(out)?;
    write_move(out, outcomes)?;

    write_banner(out, "SUMMARY")?;
    let failed = outcomes.iter().filter(|o| o.vector.is_err()).count();
    writeln!(out, "{} of {} vectors generated.", outcomes.len() - failed, outcomes.len())?;
    writeln!(
        out,
        "Tolerance for fixed-point tests: < {}% for prices, < {}% for Greeks",
        contract.price_rel * 100.0,
        contract.greek_rel * 100.0
    )?;
    Ok(())
}

fn write_scenario_detail(
    out: &mut impl Write,
    s: &Scenario,
    r: &PricingResult,
    parity_tolerance: f64,
) -> EngineResult<()> {
    let inputs = s.inputs();
    let discounted_strike = inputs.discounted_strike()?;

    writeln!(out)?;
    writeln!(out, "d1 = {:.10}", r.d1)?;
    writeln!(out, "d2 = {:.10}", r.d2)?;
    writeln!(out)?;
    writeln!(out, "Call Price = {:.10}", r.call_price)?;
    writeln!(out, "Put Price  = {:.10}", r.put_price)?;
    writeln!(out, "Intrinsic Value = {:.10}", PricingResult::intrinsic_call(&inputs))?;
    writeln!(out, "Time Value = {:.10}", r.time_value(&inputs))?;
    writeln!(out, "Forward Diff = {:.10}", inputs.spot - discounted_strike)?;

    let parity = verify_parity(&inputs, r, parity_tolerance)?;
    writeln!(out)?;
    writeln!(out, "Put-Call Parity Check:")?;
    writeln!(out, "  C - P = {:.10}", parity.lhs)?;
    writeln!(out, "  S - K*e^(-rT) = {:.10}", parity.rhs)?;
    writeln!(out, "  deviation = {:e} ({})", parity.deviation, if parity.holds { "ok" } else { "FAILED" })?;

    writeln!(out)?;
    writeln!(out, "Greeks:")?;
    for (name, value) in r.greeks() {
        writeln!(out, "  {name:<10} = {value:.10}")?;
    }

    writeln!(out)?;
    writeln!(out, "WAD-scaled values:")?;
    for (name, value) in [
        ("d1", r.d1),
        ("d2", r.d2),
        ("call", r.call_price),
        ("put", r.put_price),
        ("delta_call", r.delta_call),
        ("gamma", r.gamma),
        ("vega", r.vega),
    ] {
        match to_scaled(value) {
            Ok(n) => writeln!(out, "  {name:<10} = {n}")?,
            Err(e) => writeln!(out, "  {name:<10} = <{e}>")?,
        }
    }
    Ok(())
}

/// 1000000000000000000 -> 1_000_000_000_000_000_000
fn group_digits(n: i128) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('_');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::generator::generate;
    use crate::vectors::scenarios::{ATM, PARITY_SCENARIOS, REPORT_SCENARIOS, VECTOR_SCENARIOS};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> EngineResult<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).expect("write to Vec never fails");
        String::from_utf8(buf).expect("utf8 output")
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(WAD), "1_000_000_000_000_000_000");
        assert_eq!(group_digits(12_345), "12_345");
        assert_eq!(group_digits(-999), "-999");
    }

    #[test]
    fn test_move_output_layout() {
        let engine = BlackScholesEngine::default();
        let outcomes = generate(&engine, &VECTOR_SCENARIOS[..1]);
        let text = render(|buf| write_move(buf, &outcomes));

        assert!(text.starts_with("const SCALE: u256 = 1_000_000_000_000_000_000;\n\n"));
        assert!(text.contains("// ATM standard: S=100, K=100, T=1.0, r=5.0%, σ=20.0%\n"), "{text}");
        assert!(text.contains("// Call = 10.450584, Put = 5.573526\n"), "{text}");
        assert!(text.contains("let spot = 100 * SCALE;\n"));
        assert!(text.contains("let time = 1000000000000000000; // 1.0\n"));
        assert!(text.contains("let rate = 50000000000000000; // 5.0%\n"));
        assert!(text.contains("let vol = 200000000000000000; // 20.0%\n"));
        assert!(text.contains("// Expected call: 1045058357218"), "{text}");
    }

    #[test]
    fn test_move_output_marks_failed_scenario() {
        let engine = BlackScholesEngine::default();
        let outcomes = generate(&engine, &[Scenario { label: "Expired", time: 0.0, ..ATM }]);
        let text = render(|buf| write_move(buf, &outcomes));
        assert!(text.contains("// skipped: domain error: time_to_expiry"), "{text}");
        assert!(!text.contains("let spot"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let engine = BlackScholesEngine::default();
        let scenarios = [ATM, Scenario { label: "Zero vol", volatility: 0.0, ..ATM }];
        let outcomes = generate(&engine, &scenarios);
        let text = render(|buf| write_json(buf, &outcomes));

        let parsed: serde_json::Value = serde_json::from_str(&text).expect("valid JSON");
        let entries = parsed.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["label"], "ATM standard");
        assert_eq!(entries[0]["time_scaled"].as_u64(), Some(1_000_000_000_000_000_000));
        assert!(entries[0]["greeks_scaled"]["gamma"].is_number());
        assert!(entries[1]["error"].as_str().is_some_and(|e| e.contains("volatility")));
    }

    #[test]
    fn test_report_sections() {
        let engine = BlackScholesEngine::default();
        let outcomes = generate(&engine, VECTOR_SCENARIOS);
        let text = render(|buf| {
            write_report(
                buf,
                &engine,
                REPORT_SCENARIOS,
                PARITY_SCENARIOS,
                &outcomes,
                1e-10,
                &ToleranceContract::default(),
            )
        });

        assert!(text.contains("TEST: ATM Option (S=100, K=100, T=1.0, r=5.0%, σ=20.0%)"), "{text}");
        assert!(text.contains("Call Price = 10.4505835722"));
        assert!(text.contains("Put Price  = 5.5735260223"));
        assert!(text.contains("PUT-CALL PARITY VERIFICATION"));
        assert_eq!(text.matches("✓ S=").count(), PARITY_SCENARIOS.len());
        assert!(!text.contains("✗"));
        assert!(text.contains("MOVE TEST VECTORS"));
        assert!(text.contains("6 of 6 vectors generated."));
        assert!(text.contains("< 0.1% for prices, < 0.5% for Greeks"));
    }
}
