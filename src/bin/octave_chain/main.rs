//! octave_chain - offline renderer and live player for the effect chain
//!
//! Run with: cargo run -- render --set pitch12=0.8 --set delay_feedback=0.6
//!       or: cargo run -- play

mod play;
mod render;
mod tone;

use clap::{Parser, Subcommand};
use octave_chain::{ParamId, ParamStore};

#[derive(Parser)]
#[command(name = "octave_chain", about = "Octave voices, echo, chorus and reverb")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Push a test tone through the chain offline and report the result
    Render {
        /// Sample rate in Hz
        #[arg(short = 'r', long, default_value_t = 48_000.0)]
        sample_rate: f64,
        /// Samples per processed block
        #[arg(short, long, default_value_t = 512)]
        block_size: usize,
        /// Length of the render in seconds
        #[arg(short, long, default_value_t = 2.0)]
        seconds: f64,
        /// Test tone frequency in Hz
        #[arg(short, long, default_value_t = 220.0)]
        freq: f32,
        /// Render two output channels from the mono tone
        #[arg(long)]
        stereo: bool,
        /// Parameter override, e.g. --set delay_time=0.25
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        overrides: Vec<(String, f32)>,
    },
    /// Play a plucked tone through the chain on the default output device
    Play {
        /// Pluck frequency in Hz
        #[arg(short, long, default_value_t = 220.0)]
        freq: f32,
        /// Parameter override, e.g. --set chorus_mix=0.5
        #[arg(long = "set", value_name = "ID=VALUE", value_parser = parse_assignment)]
        overrides: Vec<(String, f32)>,
    },
}

fn parse_assignment(arg: &str) -> Result<(String, f32), String> {
    let (id, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got `{}`", arg))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("bad value for `{}`: {}", id, e))?;
    Ok((id.trim().to_string(), value))
}

/// Build a store from defaults plus command-line overrides.
fn store_with(overrides: &[(String, f32)]) -> color_eyre::Result<ParamStore> {
    let store = ParamStore::new();
    for (key, value) in overrides {
        let id: ParamId = key.parse()?;
        let applied = store.set(id, *value)?;
        println!("  {}", describe(id, applied));
    }
    Ok(store)
}

/// `Display Name (id) = value`, as echoed after every change.
fn describe(id: ParamId, value: f32) -> String {
    format!("{} ({}) = {}", id.def().name, id, value)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            sample_rate,
            block_size,
            seconds,
            freq,
            stereo,
            overrides,
        } => {
            let store = store_with(&overrides)?;
            render::run(render::RenderOptions {
                sample_rate,
                block_size,
                seconds,
                freq,
                output_channels: if stereo { 2 } else { 1 },
                params: store.snapshot(),
            })
        }
        Commands::Play { freq, overrides } => {
            let store = store_with(&overrides)?;
            play::run(freq, store)
        }
    }
}
