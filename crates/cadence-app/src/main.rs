use std::path::Path;

use anyhow::{Context, bail};
use cadence_core::config::load_config;
use cadence_recur::recur::SchedulePattern;
use chrono::Utc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Loads a schedule definition and prints its upcoming occurrences, starting
/// from the current instant.
fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true))
        .init();

    let settings = load_config()?;
    settings.engine.validate()?;

    if let Ok(filter) = EnvFilter::try_new(settings.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %settings.logging.level, "Invalid log level in config, keeping debug");
    }

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: cadence <schedule-file> [count]");
    };
    let count: usize = args
        .next()
        .map_or(Ok(10), |raw| raw.parse())
        .context("count must be a number")?;

    let pattern: SchedulePattern = config::Config::builder()
        .add_source(config::File::from(Path::new(&path)))
        .build()
        .with_context(|| format!("failed to read schedule file {path}"))?
        .try_deserialize()
        .context("schedule file does not describe a valid pattern")?;
    let pattern = pattern.validated()?;

    tracing::info!(
        frequency = %pattern.frequency,
        zone = %pattern.time_zone,
        "Schedule loaded"
    );

    let occurrences = pattern
        .occurrences()?
        .fast_forward_to(Utc::now(), settings.engine.max_catchup_steps)?;

    for occurrence in occurrences.take(count) {
        let occurrence = occurrence?;
        println!("{}", occurrence.instant.format("%Y-%m-%d %H:%M %Z"));
    }

    Ok(())
}
