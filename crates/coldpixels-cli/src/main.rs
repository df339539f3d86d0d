//! Coldpixels Control Tool
//!
//! CLI for driving a coldpixels USB LCD panel directly.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coldpixels_hw::{
    BackgroundColor, ControlRequest, Display, DisplayOperation, SysinfoPanel, TextAlignment,
    TextColor, TextLines, TimingPolicy, UsbDiscovery,
};
use config::Config;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "coldpixelsctl")]
#[command(about = "Control tool for coldpixels USB LCD panels")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the encoded control transfer instead of sending it
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the backlight level
    Brightness {
        /// Level (wrapped modulo 255)
        level: u16,
    },
    /// Store the idle and active backlight levels
    SaveBrightness { off: u16, on: u16 },
    /// Draw an icon in a slot
    Icon {
        /// Slot (wrapped modulo 47)
        position: u16,
        /// Icon number
        number: u16,
    },
    /// Draw an icon at pixel coordinates
    IconAt { x: u16, y: u16, number: u16 },
    /// Set the text background color
    Background {
        /// Color name (e.g. red, dark-grey) or RGB565 value (e.g. 0xF800)
        #[arg(value_parser = parse_background_color)]
        color: u16,
    },
    /// Write text on a line
    Text {
        /// Line number (1-6)
        line: u16,

        /// Text; a tab splits the line in two fields
        text: String,

        /// Color name (e.g. white, light-blue) or palette index
        #[arg(long, default_value = "white", value_parser = parse_text_color)]
        color: u8,

        /// Field alignment (none, centre, left, right), once per field
        #[arg(long = "align")]
        alignments: Vec<TextAlignment>,

        /// Field width in cells, once per field
        #[arg(long = "field-length", default_value = "7")]
        field_lengths: Vec<u16>,

        /// Reserve space for an icon at the start of the line
        #[arg(long)]
        pad_for_icon: bool,
    },
    /// Write text at pixel coordinates
    TextAt {
        x: u16,
        y: u16,
        text: String,

        /// Color name or palette index
        #[arg(long, default_value = "white", value_parser = parse_text_color)]
        color: u8,
    },
    /// Dim the backlight while idle
    Dim {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Clear text lines
    Clear {
        /// Line number (1-6), repeat to clear several lines
        #[arg(long = "line", required = true)]
        lines: Vec<u8>,

        /// Background color name or RGB565 value
        #[arg(long, default_value = "black", value_parser = parse_background_color)]
        color: u16,
    },
    /// Send a raw command to the flash controller
    Flash { address: u16, command: u16 },
    /// Draw a system information panel
    Sysinfo {
        #[command(subcommand)]
        panel: SysinfoCommands,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SysinfoCommands {
    /// CPU utilisation and temperature
    Cpu {
        utilisation: u16,
        temperature: u16,
        #[arg(long, default_value = "green", value_parser = parse_text_color)]
        utilisation_color: u8,
        #[arg(long, default_value = "orange", value_parser = parse_text_color)]
        temperature_color: u8,
    },
    /// RAM usage and GPU temperature
    Gpu {
        ram: u16,
        temperature: u16,
        #[arg(long, default_value = "green", value_parser = parse_text_color)]
        ram_color: u8,
        #[arg(long, default_value = "orange", value_parser = parse_text_color)]
        temperature_color: u8,
    },
    /// Network receive and send rates
    Network {
        received: u16,
        sent: u16,
        #[arg(long, default_value = "light-blue", value_parser = parse_text_color)]
        received_color: u8,
        #[arg(long, default_value = "light-green", value_parser = parse_text_color)]
        sent_color: u8,
        /// Received rate is in MB/s
        #[arg(long)]
        received_mb: bool,
        /// Sent rate is in MB/s
        #[arg(long)]
        sent_mb: bool,
    },
    /// CPU and chassis fan speeds
    Fan {
        cpu: u16,
        chassis: u16,
        #[arg(long, default_value = "cyan", value_parser = parse_text_color)]
        cpu_color: u8,
        #[arg(long, default_value = "cyan", value_parser = parse_text_color)]
        chassis_color: u8,
    },
}

/// Parses a text color name or palette index.
fn parse_text_color(s: &str) -> std::result::Result<u8, String> {
    if let Ok(color) = s.parse::<TextColor>() {
        return Ok(color.code());
    }
    s.parse::<u8>()
        .map_err(|_| format!("unknown text color '{}'", s))
}

/// Parses a background color name or RGB565 value (decimal, 0x or # hex).
fn parse_background_color(s: &str) -> std::result::Result<u16, String> {
    if let Ok(color) = s.parse::<BackgroundColor>() {
        return Ok(color.rgb565());
    }
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix('#')) {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|_| format!("unknown background color '{}'", s))
}

/// One request to send to the panel.
enum Action {
    Display(DisplayOperation),
    Sysinfo(SysinfoPanel),
}

impl Action {
    fn encode(&self) -> coldpixels_hw::Result<ControlRequest> {
        match self {
            Action::Display(op) => op.encode(),
            Action::Sysinfo(panel) => Ok(panel.encode()),
        }
    }

    fn delay(&self, timing: &TimingPolicy) -> Duration {
        match self {
            Action::Display(op) => timing.delay_after(op),
            Action::Sysinfo(_) => timing.sysinfo_wait,
        }
    }

    fn run(&self, display: &Display) -> coldpixels_hw::Result<Duration> {
        match self {
            Action::Display(op) => display.execute(op),
            Action::Sysinfo(panel) => display.display_sysinfo(panel),
        }
    }
}

#[derive(Serialize)]
struct DryRun<'a> {
    #[serde(flatten)]
    request: &'a ControlRequest,
    delay_ms: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    debug!("Using timing: {:?}", config.timing);

    let (action, message) = match build_action(cli.command)? {
        Some(built) => built,
        None => {
            print!("{}", config.to_toml()?);
            return Ok(());
        }
    };

    let timing = config.timing_policy();

    if cli.dry_run {
        let request = action.encode()?;
        let report = DryRun {
            request: &request,
            delay_ms: action.delay(&timing).as_secs_f64() * 1000.0,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let display = Display::open(&UsbDiscovery, timing)
        .context("Failed to open LCD panel. Is it plugged in?")?;
    let result = action.run(&display);
    display.release().context("Failed to release LCD panel")?;

    let delay = result.context("Command failed")?;
    debug!("Panel redraw wait: {:?}", delay);
    println!("{}", message);
    Ok(())
}

/// Maps a subcommand to its request and a confirmation message.
fn build_action(command: Commands) -> Result<Option<(Action, String)>> {
    let built = match command {
        Commands::Brightness { level } => (
            Action::Display(DisplayOperation::SetBrightness { level }),
            format!("Brightness set to: {}", level),
        ),
        Commands::SaveBrightness { off, on } => (
            Action::Display(DisplayOperation::SaveBrightness { off, on }),
            format!("Brightness saved (idle: {}, active: {})", off, on),
        ),
        Commands::Icon { position, number } => (
            Action::Display(DisplayOperation::DisplayIcon {
                position,
                icon: number,
            }),
            format!("Icon {} drawn in slot {}", number, position),
        ),
        Commands::IconAt { x, y, number } => (
            Action::Display(DisplayOperation::DisplayIconAt { x, y, icon: number }),
            format!("Icon {} drawn at ({}, {})", number, x, y),
        ),
        Commands::Background { color } => (
            Action::Display(DisplayOperation::SetTextBackground { color }),
            format!("Text background set to: {:#06X}", color),
        ),
        Commands::Text {
            line,
            text,
            color,
            alignments,
            field_lengths,
            pad_for_icon,
        } => (
            Action::Display(DisplayOperation::DisplayTextOnLine {
                line,
                text,
                pad_for_icon,
                alignments,
                color,
                field_lengths,
            }),
            format!("Text written on line {}", line),
        ),
        Commands::TextAt { x, y, text, color } => (
            Action::Display(DisplayOperation::DisplayTextAt { x, y, text, color }),
            format!("Text written at ({}, {})", x, y),
        ),
        Commands::Dim { state } => {
            let enabled = matches!(state, Toggle::On);
            (
                Action::Display(DisplayOperation::DimWhenIdle { enabled }),
                format!(
                    "Dim when idle: {}",
                    if enabled { "enabled" } else { "disabled" }
                ),
            )
        }
        Commands::Clear { lines, color } => {
            let mask = TextLines::from_lines(lines.iter().copied())?;
            (
                Action::Display(DisplayOperation::ClearLines {
                    lines: mask.bits(),
                    color,
                }),
                format!("Cleared lines {:?}", lines),
            )
        }
        Commands::Flash { address, command } => (
            Action::Display(DisplayOperation::SendFlashCommand { address, command }),
            format!("Flash command {:#06X} sent to {:#06X}", command, address),
        ),
        Commands::Sysinfo { panel } => build_sysinfo(panel),
        Commands::Config => return Ok(None),
    };
    Ok(Some(built))
}

fn build_sysinfo(panel: SysinfoCommands) -> (Action, String) {
    let panel = match panel {
        SysinfoCommands::Cpu {
            utilisation,
            temperature,
            utilisation_color,
            temperature_color,
        } => SysinfoPanel::Cpu {
            utilisation,
            temperature,
            utilisation_color,
            temperature_color,
        },
        SysinfoCommands::Gpu {
            ram,
            temperature,
            ram_color,
            temperature_color,
        } => SysinfoPanel::RamGpu {
            ram,
            temperature,
            ram_color,
            temperature_color,
        },
        SysinfoCommands::Network {
            received,
            sent,
            received_color,
            sent_color,
            received_mb,
            sent_mb,
        } => SysinfoPanel::Network {
            received,
            sent,
            received_color,
            sent_color,
            received_mb,
            sent_mb,
        },
        SysinfoCommands::Fan {
            cpu,
            chassis,
            cpu_color,
            chassis_color,
        } => SysinfoPanel::Fan {
            cpu,
            chassis,
            cpu_color,
            chassis_color,
        },
    };
    let message = format!("{} panel updated", panel.name());
    (Action::Sysinfo(panel), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_colors() {
        assert_eq!(parse_text_color("light-blue"), Ok(18));
        assert_eq!(parse_text_color("40"), Ok(40));
        assert!(parse_text_color("teal").is_err());
        assert_eq!(parse_background_color("red"), Ok(0xF800));
        assert_eq!(parse_background_color("0x07e0"), Ok(0x07E0));
        assert_eq!(parse_background_color("#001F"), Ok(0x001F));
        assert_eq!(parse_background_color("65535"), Ok(0xFFFF));
        assert!(parse_background_color("0xZZ").is_err());
    }

    #[test]
    fn test_text_command() {
        let cli = Cli::try_parse_from([
            "coldpixelsctl",
            "text",
            "2",
            "CPU\t45",
            "--color",
            "red",
            "--align",
            "left",
            "--align",
            "right",
            "--pad-for-icon",
        ])
        .unwrap();
        let (action, _) = build_action(cli.command).unwrap().unwrap();
        let request = action.encode().unwrap();
        assert_eq!(request.request, 24);
        assert_eq!(request.index, 256 + 3);
        assert_eq!(request.value as usize, request.payload.len());
    }

    #[test]
    fn test_clear_command() {
        let cli = Cli::try_parse_from([
            "coldpixelsctl",
            "clear",
            "--line",
            "1",
            "--line",
            "3",
            "--color",
            "red",
        ])
        .unwrap();
        let (action, _) = build_action(cli.command).unwrap().unwrap();
        let request = action.encode().unwrap();
        assert_eq!((request.request, request.value, request.index), (26, 5, 0xF800));
    }

    #[test]
    fn test_clear_rejects_bad_line() {
        let cli = Cli::try_parse_from(["coldpixelsctl", "clear", "--line", "7"]).unwrap();
        assert!(build_action(cli.command).is_err());
    }

    #[test]
    fn test_sysinfo_command() {
        let cli = Cli::try_parse_from([
            "coldpixelsctl",
            "--dry-run",
            "sysinfo",
            "network",
            "120",
            "8",
            "--sent-mb",
        ])
        .unwrap();
        assert!(cli.dry_run);
        let (action, message) = build_action(cli.command).unwrap().unwrap();
        let request = action.encode().unwrap();
        assert_eq!(request.request, 20);
        assert_eq!(request.payload, b"011831".to_vec());
        assert_eq!(message, "network panel updated");
        assert_eq!(
            action.delay(&TimingPolicy::default()),
            Duration::from_millis(50)
        );
    }

    #[test]
    fn test_oversized_text_is_an_error() {
        let text = "x".repeat(70000);
        let cli = Cli::try_parse_from(["coldpixelsctl", "--dry-run", "text-at", "0", "0", &text])
            .unwrap();
        let (action, _) = build_action(cli.command).unwrap().unwrap();
        assert!(action.encode().is_err());
    }
}
