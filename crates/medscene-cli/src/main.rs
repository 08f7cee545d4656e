//! Medscene CLI - Inspect, simulate and view the medical scene natively

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medscene_bevy::{run_app, NativeHost, ShutdownHandle, WindowTarget};
use medscene_core::load_config;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "medscene")]
#[command(about = "Procedural medical 3D scene tools")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "medscene.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Container width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Container height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scene graph as JSON
    Dump {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Advance the scene without a window and print per-frame samples
    Simulate {
        #[arg(long, default_value_t = 120)]
        frames: u64,
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
    },
    /// Open a native window with the scene
    View,
    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Medscene v{}", env!("CARGO_PKG_VERSION"));

    if let Command::InitConfig { force } = args.command {
        return commands::init_config(&args.config, force);
    }

    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let host = NativeHost {
        width: args.width,
        height: args.height,
        ..NativeHost::default()
    };
    let mut runtime = commands::build_runtime(config, &host)?;

    match args.command {
        Command::Dump { output } => {
            let json = commands::dump(&runtime)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), "Scene graph written");
                }
                None => println!("{}", json),
            }
        }
        Command::Simulate { frames, fps } => {
            let mut stdout = std::io::stdout().lock();
            commands::simulate(&mut runtime, frames, fps, |sample| {
                writeln!(stdout, "{}", serde_json::to_string(&sample)?)?;
                Ok(())
            })?;
        }
        Command::View => {
            let exit = run_app(
                runtime,
                WindowTarget {
                    title: "Medscene".to_string(),
                    canvas: None,
                },
                ShutdownHandle::default(),
            );
            info!(?exit, "Viewer closed");
        }
        Command::InitConfig { .. } => {}
    }

    Ok(())
}
