use std::error::Error;
use std::time::Instant;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::browser::memory::{FormFixture, MemoryPage};
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, SeedArgs, resolve_rng_seed, resolve_trace_path};
use crate::data::generator::RandomGenerator;
use crate::fill::autofill::AutoFiller;
use crate::fill::seed::Seed;
use crate::report::console::{format_console_report, format_json_report};
use crate::report::report_model::FillReport;
use crate::trace::logger::TraceLogger;

// ============================================================================
// Shared helpers
// ============================================================================

/// Build the seed from CLI arguments.
///
/// `--seed-date` gives a date seed. `--seed` is parsed as JSON when it can
/// be, so `{"email": "a@b.c"}` is structured and `42` is a number; anything
/// else is used as plain text. No seed at all yields `Seed::Null`.
pub fn parse_seed(args: &SeedArgs) -> Result<Seed, Box<dyn Error>> {
    if let Some(date) = &args.seed_date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| format!("invalid --seed-date '{}': {}", date, e))?;
        return Ok(Seed::from(date));
    }

    Ok(match &args.seed {
        Some(raw) => serde_json::from_str::<Value>(raw)
            .map(Seed::from)
            .unwrap_or_else(|_| Seed::Text(raw.clone())),
        None => Seed::Null,
    })
}

/// Build a filler from CLI arguments and config.
pub fn build_filler(args: &SeedArgs, config: &AppConfig, trace: Option<&str>) -> AutoFiller {
    let generator = match resolve_rng_seed(args.rng_seed, &config.generator) {
        Some(seed) => RandomGenerator::seeded(seed),
        None => RandomGenerator::from_entropy(),
    }
    .with_length(config.generator.min_length, config.generator.max_length);

    let filler = AutoFiller::new(Box::new(generator));
    match resolve_trace_path(trace, &config.trace) {
        Some(path) => filler.with_tracer(TraceLogger::new(path)),
        None => filler,
    }
}

/// Render a report in the requested format.
pub fn render_report(report: &FillReport, format: &str) -> Result<String, Box<dyn Error>> {
    match format {
        "console" => Ok(format_console_report(report)),
        "json" => Ok(format_json_report(report)?),
        other => Err(format!("Unknown format '{}'. Use: console, json", other).into()),
    }
}

// ============================================================================
// fill subcommand
// ============================================================================

/// Fill a fixture in memory and return the resulting report.
pub fn run_fill(
    fixture_path: &str,
    seed_args: &SeedArgs,
    submit: bool,
    trace: Option<&str>,
    config: &AppConfig,
) -> Result<FillReport, Box<dyn Error>> {
    let fixture = FormFixture::load(fixture_path)?;
    let mut page = MemoryPage::from_fixture(&fixture);
    let roots = page.roots().to_vec();

    let seed = parse_seed(seed_args)?;
    let mut filler = build_filler(seed_args, config, trace);

    let start = Instant::now();
    let then = filler.fill(&mut page, &roots, &seed)?;
    if submit {
        then.submit()?;
    }
    let duration_ms = start.elapsed().as_millis();

    let name = if fixture.name.is_empty() {
        fixture_path
    } else {
        fixture.name.as_str()
    };

    Ok(FillReport::new(name, seed.mode(), page.snapshot())
        .with_submitted(page.submitted().is_some())
        .with_duration(duration_ms))
}

pub fn cmd_fill(
    fixture_path: &str,
    seed_args: &SeedArgs,
    format: &str,
    submit: bool,
    trace: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let report = run_fill(fixture_path, seed_args, submit, trace, config)?;
    println!("{}", render_report(&report, format)?);
    Ok(())
}

// ============================================================================
// live subcommand
// ============================================================================

pub fn cmd_live(
    url: &str,
    selector: &str,
    seed_args: &SeedArgs,
    submit: bool,
    script: Option<&str>,
    trace: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn Error>> {
    let seed = parse_seed(seed_args)?;
    let mut filler = build_filler(seed_args, config, trace);

    let script = script.unwrap_or(config.browser.script.as_str());
    let mut session = BrowserSession::launch(script)?;

    info!("Navigating to: {}", url);
    session.navigate(url)?;

    let start = Instant::now();
    let then = filler.fill_selector(&mut session, selector, &seed)?;
    if submit {
        then.submit()?;
        session.wait_idle(config.browser.after_submit_wait_ms)?;
    }

    println!(
        "Filled '{}' on {} ({:?} seed) in {:.1}s{}",
        selector,
        url,
        seed.mode(),
        start.elapsed().as_secs_f64(),
        if submit { ", submitted" } else { "" }
    );

    session.quit()?;
    Ok(())
}
