//! Daylight - acompanha a luz do dia numa lâmpada RGB
//! Command-line runner: synthetic camera + simulated lamp driven by the control loop

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use daylight_actuator::SimulatedLamp;
use daylight_orchestration::{ControlLoop, DaylightConfig, EventFilter, LoopStatus, StopReason};
use daylight_photonic::SyntheticCamera;

const DEFAULT_FILTER: &str = "daylight=info,daylight_orchestration=info";

#[derive(Parser, Debug)]
#[command(name = "daylight")]
#[command(version = "2026.1.16")]
#[command(about = "Track ambient daylight from a camera on an RGB lamp", long_about = None)]
struct Args {
    /// Settings file (TOML)
    #[arg(short, long, value_name = "FILE", env = "DAYLIGHT_SETTINGS")]
    settings: Option<PathBuf>,

    /// Stop after N ticks (runs until killed otherwise)
    #[arg(short = 'n', long, value_name = "N")]
    iterations: Option<u64>,

    /// Override the tick interval
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Log level for the daylight crates (RUST_LOG wins when unset)
    #[arg(short, long, value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: Option<String>,

    /// Print loop events to stdout as JSON lines
    #[arg(long)]
    json_events: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    print_config: bool,
}

/// Alvos casam por prefixo: `daylight` cobre todos os crates `daylight_*`
fn env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::new(format!("daylight={level}")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()),
    }
}

fn init_tracing(level: Option<&str>) {
    // Logs vão para stderr; stdout fica livre para os eventos JSON
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<DaylightConfig> {
    let mut config = DaylightConfig::load(args.settings.as_deref()).with_context(|| match &args.settings {
        Some(path) => format!("failed to load settings from {}", path.display()),
        None => "failed to load settings from environment".to_string(),
    })?;

    if let Some(iterations) = args.iterations {
        config.control.max_ticks = Some(iterations);
    }
    if let Some(interval_ms) = args.interval_ms {
        config.control.schedule.interval_ms = interval_ms;
    }
    config.validate().context("invalid command-line overrides")?;
    Ok(config)
}

fn print_summary(reason: StopReason, status: &LoopStatus, lamp: &SimulatedLamp) {
    let color = match status.last_applied_color {
        Some(color) => color.to_hex(),
        None => "-".to_string(),
    };

    eprintln!("{} {}", "Stopped:".green().bold(), reason);
    eprintln!("  ticks:        {}", status.ticks);
    eprintln!("  failures:     {}", status.total_failures);
    eprintln!("  lamp writes:  {}", lamp.writes().len());
    eprintln!("  last color:   {}", color.cyan());
    if status.escalated {
        eprintln!("  {}", "camera escalation active".red().bold());
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let camera = SyntheticCamera::with_config(config.capture.synthetic.clone())
        .context("invalid synthetic camera settings")?;
    let lamp = SimulatedLamp::new();
    let mut control = ControlLoop::new(camera, lamp.clone(), &config)?;

    if args.json_events {
        control.events().subscribe(EventFilter::All, |event| match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(error = %err, "failed to encode event"),
        })?;
    }

    let reason = control.run()?;
    print_summary(reason, &control.status()?, &lamp);
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    if let Err(err) = run(args) {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("daylight").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_args_parse() {
        let args = parse(&["--iterations", "5", "--log-level", "debug", "--json-events"]);
        assert_eq!(args.iterations, Some(5));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.json_events);
        assert!(!args.print_config);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let result = Args::try_parse_from(["daylight", "--log-level", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_for_level() {
        let filter = env_filter(Some("trace")).to_string();
        assert!(filter.contains("daylight=trace"));
    }

    #[test]
    fn test_settings_file_and_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[control]\ninterval_ms = 900\n\n[mapping]\nalpha = 0.5").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = load_config(&parse(&["--settings", &path])).unwrap();
        assert_eq!(config.control.schedule.interval_ms, 900);
        assert_eq!(config.mapping.alpha, 0.5);
        assert_eq!(config.control.max_ticks, None);

        let config = load_config(&parse(&["--settings", &path, "-n", "3", "--interval-ms", "10"])).unwrap();
        assert_eq!(config.control.max_ticks, Some(3));
        assert_eq!(config.control.schedule.interval_ms, 10);
    }

    #[test]
    fn test_missing_settings_file() {
        let err = load_config(&parse(&["--settings", "/nonexistent/daylight.toml"])).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load settings"));
    }

    #[test]
    fn test_zero_interval_override_rejected() {
        let args = parse(&["--interval-ms", "0"]);
        assert!(load_config(&args).is_err());
    }
}
