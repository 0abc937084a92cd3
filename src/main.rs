// NPB postseason statistic pipeline entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; the pipeline is a batch tool)
// 2. Load config, apply an optional year override from the command line
// 3. Run the derivation pipeline
// 4. Write the four publication tables

use npb_postseason::config;
use npb_postseason::output;
use npb_postseason::pipeline;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("NPB postseason statistic pipeline starting");

    let mut config = config::load_config().context("failed to load configuration")?;

    // An explicit year argument overrides the configured season.
    if let Some(arg) = std::env::args().nth(1) {
        let year: u16 = arg
            .parse()
            .with_context(|| format!("year argument must be a number, got '{arg}'"))?;
        config::validate_year(year)?;
        config.season.year = year;
    }
    info!(
        "processing postseason {} (reference league label '{}')",
        config.season.year, config.season.league
    );

    let tables = pipeline::run(&config).context("stat derivation failed")?;
    info!(
        "derived {} batters, {} pitchers, {} team batting rows, {} team pitching rows",
        tables.batting.len(),
        tables.pitching.len(),
        tables.team_batting.len(),
        tables.team_pitching.len()
    );

    output::write_all(&config, &tables).context("failed to write publication files")?;

    info!("pipeline finished");
    Ok(())
}

/// Initialize tracing to stderr so warnings about degraded reference data
/// are visible alongside the run.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("npb_postseason=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
