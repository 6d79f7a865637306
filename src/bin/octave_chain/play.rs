use std::io::BufRead;
use std::sync::Arc;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use octave_chain::{ChainMessage, EffectChain, ParamId, ParamStore, MAX_BLOCK_SIZE};
use rtrb::RingBuffer;

use crate::tone::Pluck;

const PLUCK_INTERVAL_SECONDS: f32 = 1.5;

/// Play until stdin closes or `quit` is entered.
///
/// Each stdin line is either `ID=VALUE`, `reset` or `quit`.
pub fn run(freq: f32, store: ParamStore) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;
    let chain_outputs = channels.min(2);

    println!("=== octave_chain ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);
    println!("Type ID=VALUE to change a parameter, `reset` to clear tails, `quit` to stop");
    println!();

    let mut chain = EffectChain::new().with_channels(1, chain_outputs);
    chain.prepare(sample_rate, MAX_BLOCK_SIZE)?;

    let store = Arc::new(store);
    let audio_store = Arc::clone(&store);
    let (mut tx, mut rx) = RingBuffer::<ChainMessage>::new(8);

    let mut pluck = Pluck::new(freq, sample_rate as f32, PLUCK_INTERVAL_SECONDS);
    let mut lanes = vec![vec![0.0f32; MAX_BLOCK_SIZE]; chain_outputs];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            chain.drain_messages(&mut rx);
            let params = audio_store.snapshot();

            let total_frames = data.len() / channels;
            let mut frames_written = 0;
            while frames_written < total_frames {
                let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                let (first, rest) = lanes.split_at_mut(1);
                let source = &mut first[0][..frames];
                pluck.fill(source);
                match rest {
                    [right] => {
                        right[..frames].fill(0.0);
                        chain.process_in_place(&mut [source, &mut right[..frames]], &params);
                    }
                    _ => chain.process_in_place(&mut [source], &params),
                }

                // Devices with more than two channels repeat the last lane
                let out_off = frames_written * channels;
                for i in 0..frames {
                    for ch in 0..channels {
                        let lane = &lanes[ch.min(chain_outputs - 1)];
                        data[out_off + i * channels + ch] = lane[i];
                    }
                }

                frames_written += frames;
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;

    stream.play()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "q" => break,
            "reset" => {
                if tx.push(ChainMessage::Reset).is_err() {
                    log::warn!("reset queue full, request dropped");
                }
            }
            _ => match crate::parse_assignment(command) {
                Ok((key, value)) => {
                    let applied = key
                        .parse::<ParamId>()
                        .and_then(|id| store.set(id, value).map(|v| (id, v)));
                    match applied {
                        Ok((id, v)) => println!("  {}", crate::describe(id, v)),
                        Err(e) => println!("  {}", e),
                    }
                }
                Err(e) => println!("  {}", e),
            },
        }
    }

    Ok(())
}
