mod app;
mod controller;
mod controls;
mod editor;
mod layout;
mod playback;
mod position;
mod presentation;
mod scroll;
mod segment;
mod view;

use std::fs::{self, File};
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::{run_interactive, App};
use crate::controller::{Prompter, PLACEHOLDER_SCRIPT};
use crate::playback::{clamp_speed, DEFAULT_SPEED, MAX_SPEED, MIN_SPEED};
use crate::presentation::{Align, PresentationConfig, DEFAULT_FONT_SIZE};
use crate::segment::{segment, Unit};

#[derive(Debug, Parser)]
#[command(
    name = "prompter",
    version,
    about = "Scrolling teleprompter for the terminal"
)]
struct Cli {
    /// Script to start with. Use '-' to read from stdin. Read once, never written.
    input: Option<String>,

    /// Playback speed multiplier; one unit every 3s / speed.
    #[arg(short, long, default_value_t = DEFAULT_SPEED, value_parser = parse_speed)]
    speed: f64,

    /// Font size in px (16-72). Wider type means a narrower text column.
    #[arg(
        long,
        default_value_t = DEFAULT_FONT_SIZE,
        value_parser = clap::value_parser!(u16).range(16..=72)
    )]
    font_size: u16,

    /// Text alignment.
    #[arg(long, value_enum, default_value_t = Align::Left)]
    align: Align,

    /// Show only the active line while playing.
    #[arg(long)]
    focus: bool,

    /// Start without the control bar and borders.
    #[arg(long)]
    fullscreen: bool,

    /// Force the interactive prompter.
    #[arg(short, long)]
    interactive: bool,

    /// Print the script's lines as the prompter would step through them.
    #[arg(long)]
    plain: bool,

    /// Write diagnostics to this file. Filter with RUST_LOG.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_speed(value: &str) -> Result<f64, String> {
    let speed: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !(MIN_SPEED..=MAX_SPEED).contains(&speed) {
        return Err(format!("speed must be between {MIN_SPEED} and {MAX_SPEED}"));
    }
    Ok(clamp_speed(speed))
}

fn setup_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("prompter=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}

enum InputSource {
    File(PathBuf),
    Stdin,
    Placeholder,
}

fn detect_input(cli: &Cli) -> InputSource {
    match cli.input.as_deref() {
        Some("-") => InputSource::Stdin,
        Some(path) => InputSource::File(PathBuf::from(path)),
        None => {
            if io::stdin().is_terminal() {
                InputSource::Placeholder
            } else {
                InputSource::Stdin
            }
        }
    }
}

fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        InputSource::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read script from stdin")?;
            Ok(buf)
        }
        InputSource::Placeholder => Ok(PLACEHOLDER_SCRIPT.to_string()),
    }
}

fn plain_render(units: &[Unit]) -> String {
    let mut out = String::new();
    for unit in units {
        out.push_str(unit.as_str());
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.interactive && cli.plain {
        return Err(anyhow!("--interactive and --plain cannot be used together"));
    }

    if let Some(path) = cli.log_file.as_deref() {
        setup_tracing(path)?;
    }

    let input = detect_input(&cli);
    let script = read_input(&input)?;

    let interactive = if cli.interactive {
        true
    } else if cli.plain {
        false
    } else {
        io::stdout().is_terminal()
    };

    if !interactive {
        print!("{}", plain_render(&segment(&script)));
        return Ok(());
    }

    let config = PresentationConfig {
        font_size: cli.font_size,
        align: cli.align,
        fullscreen: cli.fullscreen,
    };
    let prompter = Prompter::new(script).with_settings(cli.speed, cli.focus, config);
    info!(
        units = prompter.units().len(),
        speed = cli.speed,
        "starting prompter"
    );

    run_interactive(App::new(prompter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults_match_a_fresh_session() {
        let cli = Cli::try_parse_from(["prompter"]).expect("parse");
        assert_eq!(cli.speed, DEFAULT_SPEED);
        assert_eq!(cli.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(cli.align, Align::Left);
        assert!(!cli.focus);
    }

    #[test]
    fn cli_rejects_out_of_range_values() {
        assert!(Cli::try_parse_from(["prompter", "--speed", "9"]).is_err());
        assert!(Cli::try_parse_from(["prompter", "--speed", "fast"]).is_err());
        assert!(Cli::try_parse_from(["prompter", "--font-size", "8"]).is_err());

        let cli = Cli::try_parse_from(["prompter", "-s", "0.5", "--align", "right"])
            .expect("parse");
        assert_eq!(cli.speed, 0.5);
        assert_eq!(cli.align, Align::Right);
    }

    #[test]
    fn plain_render_prints_one_unit_per_line() {
        let units = segment("Line one\n\nLine two\n   \nLine three");
        assert_eq!(plain_render(&units), "Line one\nLine two\nLine three\n");
    }
}
