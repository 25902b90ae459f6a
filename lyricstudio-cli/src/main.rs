//! Lyric Studio command line
//!
//! Usage:
//!   lyricstudio convert <INPUT>     - Turn pasted lyrics into an LRC file
//!   lyricstudio format <SECONDS>... - Print LRC timestamps
//!   lyricstudio init-config         - Write the config template

use clap::{Parser, Subcommand};
use lyricstudio_core::{
    format_lrc_timestamp, write_template, CoreError, LyricStudio, PlaybackClock, PlaybackSource,
    StudioConfig, TrackInfo,
};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lyricstudio", version, about = "Timestamp lyrics and export LRC files")]
struct Cli {
    /// Use this config file instead of ~/.config/lyricstudio/config.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert pasted lyrics into an LRC file
    Convert {
        /// Lyrics text file, one line per lyric; `-` reads stdin
        input: PathBuf,
        /// Playback position of the first line, in seconds
        #[arg(short, long, default_value_t = 0.0)]
        start: f64,
        /// Output file (defaults to export.file_name from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the LRC data as JSON instead of writing a file
        #[arg(long)]
        json: bool,
        /// Song title tag
        #[arg(long)]
        title: Option<String>,
        /// Artist tag
        #[arg(long)]
        artist: Option<String>,
        /// Album tag
        #[arg(long)]
        album: Option<String>,
    },
    /// Print seconds as LRC timestamps
    Format {
        #[arg(required = true, allow_negative_numbers = true)]
        seconds: Vec<f64>,
    },
    /// Write the config template
    InitConfig {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(StudioConfig::config_path);

    init_tracing(check_file_logging_enabled(&config_path));

    if let Err(e) = run(cli, &config_path) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config_path: &Path) -> lyricstudio_core::Result<()> {
    match cli.command {
        Commands::Convert {
            input,
            start,
            output,
            json,
            title,
            artist,
            album,
        } => {
            let mut config = load_config(config_path, cli.config.is_some())?;
            if let Some(title) = title {
                config.export.title = title;
            }
            if let Some(artist) = artist {
                config.export.artist = artist;
            }
            if let Some(album) = album {
                config.export.album = album;
            }

            let raw = read_input(&input)?;
            let rendered = convert(&config, &track_name(&input), &raw, start, json)?;

            if json {
                println!("{rendered}");
            } else {
                let output = output.unwrap_or_else(|| PathBuf::from(&config.export.file_name));
                fs::write(&output, rendered)?;
                info!("Wrote {}", output.display());
            }
            Ok(())
        }
        Commands::Format { seconds } => {
            for value in seconds {
                println!("[{}]", format_lrc_timestamp(value));
            }
            Ok(())
        }
        Commands::InitConfig { force } => {
            if config_path.exists() && !force {
                info!(
                    "Config already exists at {}, pass --force to overwrite it",
                    config_path.display()
                );
                return Ok(());
            }
            write_template(config_path)
        }
    }
}

/// Load the config, falling back to defaults when the default file was just created
fn load_config(path: &Path, explicit: bool) -> lyricstudio_core::Result<StudioConfig> {
    if explicit {
        return StudioConfig::load_from(path);
    }

    match StudioConfig::load_or_create() {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { path }) => {
            info!("Created config template at {}, using defaults", path.display());
            Ok(StudioConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        fs::read_to_string(input)
    }
}

fn track_name(input: &Path) -> String {
    if input.as_os_str() == "-" {
        return "stdin".to_string();
    }

    input
        .file_stem()
        .map_or_else(|| "stdin".to_string(), |stem| stem.to_string_lossy().into_owned())
}

/// Import `raw` starting at `start` seconds and render it as LRC text or JSON
fn convert(
    config: &StudioConfig,
    name: &str,
    raw: &str,
    start: f64,
    json: bool,
) -> lyricstudio_core::Result<String> {
    let mut clock = PlaybackClock::default();
    clock.seek(start);

    let mut studio = LyricStudio::with_config(config);
    studio.load_track(TrackInfo::new(name, Duration::ZERO), Box::new(clock));

    let count = studio.import_external_text(raw);
    info!("Imported {} lyric lines from {}", count, name);

    if json {
        if !studio.can_export() {
            return Err(CoreError::ExportBlocked {
                reason: "there are no lyric lines".to_string(),
            });
        }
        studio.generate_lrc().to_json()
    } else {
        studio.export_lrc()
    }
}

/// Check if file logging is enabled by reading just the logging section of the config
fn check_file_logging_enabled(config_path: &Path) -> bool {
    #[derive(serde::Deserialize)]
    struct PartialConfig {
        #[serde(default)]
        logging: PartialLoggingConfig,
    }
    #[derive(serde::Deserialize, Default)]
    struct PartialLoggingConfig {
        #[serde(default)]
        enabled: bool,
    }

    let Ok(content) = fs::read_to_string(config_path) else {
        return false;
    };

    toml::from_str::<PartialConfig>(&content)
        .map(|c| c.logging.enabled)
        .unwrap_or(false)
}

/// Initialize tracing with console output and optional file logging
fn init_tracing(file_logging_enabled: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    if file_logging_enabled {
        let log_path = lyricstudio_core::log_file_path();

        if let Some(parent) = log_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        match File::create(&log_path) {
            Ok(file) => {
                let file_layer = tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt_layer)
                    .with(file_layer)
                    .init();

                return;
            }
            Err(e) => {
                eprintln!("Failed to create log file at {}: {e}", log_path.display());
            }
        }
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_renders_lrc() {
        let config = StudioConfig::default();
        let lrc = convert(&config, "song", "first\n\nsecond\n", 65.0, false).unwrap();

        assert_eq!(
            lrc,
            "[ti:Untitled Song]\n[ar:Unknown Artist]\n[al:Unknown Album]\n\n[01:05.00]first\n[01:07.00]second\n"
        );
    }

    #[test]
    fn test_convert_uses_configured_spacing() {
        let config = StudioConfig::parse("[timeline]\nimport_spacing_secs = 4.0\n").unwrap();
        let lrc = convert(&config, "song", "a\nb", 0.0, false).unwrap();

        assert!(lrc.ends_with("[00:00.00]a\n[00:04.00]b\n"));
    }

    #[test]
    fn test_convert_json() {
        let mut config = StudioConfig::default();
        config.export.artist = "The Band".to_string();

        let json = convert(&config, "song", "hello", 1.5, true).unwrap();
        assert!(json.contains("\"artist\": \"The Band\""));
        assert!(json.contains("\"time\": \"00:01.50\""));
    }

    #[test]
    fn test_convert_blank_input_is_blocked() {
        let config = StudioConfig::default();
        for json in [false, true] {
            let result = convert(&config, "song", "  \n", 0.0, json);
            assert!(matches!(result, Err(CoreError::ExportBlocked { .. })));
        }
    }

    #[test]
    fn test_track_name() {
        assert_eq!(track_name(Path::new("lyrics/my song.txt")), "my song");
        assert_eq!(track_name(Path::new("")), "stdin");
        assert_eq!(track_name(Path::new("-")), "stdin");
    }

    #[test]
    fn test_file_logging_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(!check_file_logging_enabled(&path));

        fs::write(&path, "[logging]\nenabled = true\n").unwrap();
        assert!(check_file_logging_enabled(&path));

        fs::write(&path, "[logging\n").unwrap();
        assert!(!check_file_logging_enabled(&path));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[export]\ntitle = \"Custom\"\n").unwrap();

        let config = load_config(&path, true).unwrap();
        assert_eq!(config.export.title, "Custom");
    }

    #[test]
    fn test_cli_parses_negative_seconds() {
        let cli = Cli::try_parse_from(["lyricstudio", "format", "-1.5", "65"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Format { ref seconds } if seconds == &[-1.5, 65.0]
        ));
    }
}
