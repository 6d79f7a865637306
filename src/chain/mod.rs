//! The fixed-topology effect chain and its per-sample stages.
//!
//! ```text
//!            ┌──────────────── dry × pitch0 ───────────────┐
//!            │                                             ▼
//! input ──┬──┴─→ [Pitch voices] ─→ [Echo] ─────────────→ (+) ─→ [Chorus] ─→ scratch
//!                  0.5, 2.0, 4.0     feedback                                   │
//!                                                                               ▼
//!                                                    output ←─ [Reverb, whole block]
//! ```
//!
//! Pitch, echo, dry combine and chorus run sample by sample; the reverb runs
//! once over the finished block. All buffers are sized in
//! [`EffectChain::prepare`], so [`EffectChain::process`] never allocates,
//! locks or logs.

/// Modulated delay tap blended with its input.
pub mod chorus;
/// Integer-tap feedback echo.
pub mod echo;
/// Control messages consumed between blocks.
pub mod message;
/// Four-ratio pitch voices over one shared history.
pub mod pitch;

use log::{debug, info};

use crate::{
    config::ProcessSpec,
    dsp::reverb::{BlockReverb, FreeverbStage, ReverbParams},
    error::Result,
    params::ParamSnapshot,
    MAX_CHANNELS, REVERB_WIDTH, TAIL_SECONDS,
};

use self::{
    chorus::{ChorusSettings, ChorusStage},
    echo::EchoStage,
    message::{ChainMessage, MessageReceiver},
    pitch::{PitchVoiceBank, DRY_VOICE},
};

/// One sample across all channels.
pub type Frame = [f32; MAX_CHANNELS];

/// Lifecycle of an [`EffectChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainStatus {
    /// Constructed, buffers not sized yet
    Uninitialized,
    /// Sized and silent; nothing processed since prepare or reset
    Prepared,
    /// At least one block processed since prepare or reset
    Processing,
}

/// Pitch → echo → dry combine → chorus → reverb.
///
/// A plain value owned by the host. The chain holds every piece of streaming
/// state exclusively: three delay lines, the voice cursors, the LFO phase,
/// the reverb and a scratch block.
pub struct EffectChain<R: BlockReverb = FreeverbStage> {
    spec: ProcessSpec,
    status: ChainStatus,
    pitch: PitchVoiceBank,
    echo: EchoStage,
    chorus: ChorusStage,
    reverb: R,
    scratch: Vec<Vec<f32>>,
}

impl EffectChain<FreeverbStage> {
    pub fn new() -> Self {
        Self::with_reverb(FreeverbStage::default())
    }
}

impl Default for EffectChain<FreeverbStage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BlockReverb> EffectChain<R> {
    /// Build a chain around any block reverb.
    pub fn with_reverb(reverb: R) -> Self {
        Self {
            spec: ProcessSpec::default(),
            status: ChainStatus::Uninitialized,
            pitch: PitchVoiceBank::new(0, 1),
            echo: EchoStage::new(0, 1),
            chorus: ChorusStage::new(0, 1),
            reverb,
            scratch: Vec::new(),
        }
    }

    /// Set the channel layout used by the next [`EffectChain::prepare`].
    pub fn with_channels(mut self, input_channels: usize, output_channels: usize) -> Self {
        self.spec = self.spec.with_channels(input_channels, output_channels);
        self
    }

    /// Size every buffer for `sample_rate` and `max_block_size`, keeping the
    /// configured channel layout.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        let spec = ProcessSpec {
            sample_rate,
            max_block_size,
            ..self.spec
        };
        self.prepare_with(spec)
    }

    /// Allocate and zero all state for `spec`. Not realtime-safe.
    pub fn prepare_with(&mut self, spec: ProcessSpec) -> Result<()> {
        spec.validate()?;

        let capacity = spec.delay_capacity();
        self.pitch.resize(spec.input_channels, capacity);
        self.echo.resize(spec.output_channels, capacity);
        self.chorus.resize(spec.output_channels, capacity);
        self.reverb.prepare(spec.sample_rate, spec.output_channels);
        self.scratch = vec![vec![0.0; spec.max_block_size]; spec.output_channels];

        self.spec = spec;
        self.status = ChainStatus::Prepared;

        info!(
            "prepared: {} Hz, max block {}, {} -> {} channels, delay capacity {}",
            spec.sample_rate, spec.max_block_size, spec.input_channels, spec.output_channels, capacity
        );
        Ok(())
    }

    /// Silence all history without reallocating.
    ///
    /// Does nothing before the first [`EffectChain::prepare`].
    pub fn reset(&mut self) {
        if self.status == ChainStatus::Uninitialized {
            debug!("reset ignored: chain not prepared");
            return;
        }
        self.clear_state();
        debug!("reset: delay lines, cursors, LFO and reverb cleared");
    }

    fn clear_state(&mut self) {
        self.pitch.reset();
        self.echo.reset();
        self.chorus.reset();
        self.reverb.reset();
        for lane in &mut self.scratch {
            lane.fill(0.0);
        }
        self.status = ChainStatus::Prepared;
    }

    /// Apply pending control messages. Realtime-safe; call between blocks.
    pub fn drain_messages<M: MessageReceiver>(&mut self, rx: &mut M) {
        while let Some(msg) = rx.pop() {
            match msg {
                ChainMessage::Reset => {
                    if self.status != ChainStatus::Uninitialized {
                        self.clear_state();
                    }
                }
            }
        }
    }

    pub fn status(&self) -> ChainStatus {
        self.status
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    /// Extra latency of the output relative to the input. The dry path is
    /// sample-aligned.
    pub fn latency_samples(&self) -> usize {
        0
    }

    /// How long the chain keeps ringing after its input goes silent.
    pub fn tail_seconds(&self) -> f64 {
        TAIL_SECONDS
    }

    pub fn pitch(&self) -> &PitchVoiceBank {
        &self.pitch
    }

    pub fn echo(&self) -> &EchoStage {
        &self.echo
    }

    pub fn chorus(&self) -> &ChorusStage {
        &self.chorus
    }

    pub fn reverb(&self) -> &R {
        &self.reverb
    }

    /// Process one block from `input` into `output`.
    ///
    /// `input` holds the prepared number of input channels, `output` the
    /// prepared number of output channels, all of one length.
    ///
    /// # Panics
    ///
    /// Panics if called before [`EffectChain::prepare`], if the channel counts
    /// differ from the prepared layout, or if the block is longer than the
    /// prepared maximum.
    pub fn process(&mut self, input: &[&[f32]], output: &mut [&mut [f32]], params: &ParamSnapshot) {
        self.assert_prepared();
        assert_eq!(input.len(), self.spec.input_channels, "input channel count");
        assert_eq!(output.len(), self.spec.output_channels, "output channel count");

        let num_samples = input[0].len();
        assert!(
            input.iter().all(|c| c.len() == num_samples)
                && output.iter().all(|c| c.len() == num_samples),
            "all channels of a block must have the same length"
        );

        self.render(|ch, n| input[ch][n], num_samples, params);

        for (out, lane) in output.iter_mut().zip(&self.scratch) {
            out.copy_from_slice(&lane[..num_samples]);
        }
    }

    /// Process one block in place.
    ///
    /// `buffers` holds the prepared number of output channels; the first
    /// `input_channels` of them carry the input.
    ///
    /// # Panics
    ///
    /// Same preconditions as [`EffectChain::process`].
    pub fn process_in_place(&mut self, buffers: &mut [&mut [f32]], params: &ParamSnapshot) {
        self.assert_prepared();
        assert_eq!(buffers.len(), self.spec.output_channels, "output channel count");

        let num_samples = buffers[0].len();
        assert!(
            buffers.iter().all(|c| c.len() == num_samples),
            "all channels of a block must have the same length"
        );

        {
            let view: &[&mut [f32]] = buffers;
            self.render(|ch, n| view[ch][n], num_samples, params);
        }

        for (out, lane) in buffers.iter_mut().zip(&self.scratch) {
            out.copy_from_slice(&lane[..num_samples]);
        }
    }

    fn assert_prepared(&self) {
        assert!(
            self.status != ChainStatus::Uninitialized,
            "EffectChain::process called before prepare"
        );
    }

    /// Run the per-sample stages into the scratch block, then the reverb.
    fn render<F>(&mut self, input: F, num_samples: usize, params: &ParamSnapshot)
    where
        F: Fn(usize, usize) -> f32,
    {
        assert!(
            num_samples <= self.spec.max_block_size,
            "block of {} samples exceeds prepared maximum {}",
            num_samples,
            self.spec.max_block_size
        );
        self.status = ChainStatus::Processing;

        let ProcessSpec {
            sample_rate,
            input_channels,
            output_channels,
            ..
        } = self.spec;

        let weights = params.pitch_mix;
        let dry_gain = weights[DRY_VOICE];
        let delay_samples = EchoStage::delay_samples(params.delay_time, sample_rate);
        let feedback = params.delay_feedback;
        let chorus = ChorusSettings::new(
            params.chorus_rate,
            params.chorus_depth,
            params.chorus_mix,
            sample_rate,
        );

        for n in 0..num_samples {
            let mut dry: Frame = [0.0; MAX_CHANNELS];
            for (ch, slot) in dry.iter_mut().enumerate().take(input_channels) {
                *slot = input(ch, n);
            }
            // Outputs without an input of their own take channel 0
            let first = dry[0];
            for slot in dry.iter_mut().take(output_channels).skip(input_channels) {
                *slot = first;
            }

            let wet = self.pitch.process_frame(&dry, &weights);
            let echoed = self.echo.process_frame(&wet, delay_samples, feedback);

            let mut combined: Frame = [0.0; MAX_CHANNELS];
            for (ch, slot) in combined.iter_mut().enumerate().take(output_channels) {
                *slot = echoed[ch] + dry[ch] * dry_gain;
            }

            let out = self.chorus.process_frame(&combined, &chorus);
            for (lane, &sample) in self.scratch.iter_mut().zip(out.iter()) {
                lane[n] = sample;
            }
        }

        self.reverb.set_params(&ReverbParams {
            width: REVERB_WIDTH,
            ..params.reverb
        });
        match self.scratch.as_mut_slice() {
            [mono] => self.reverb.process_mono(&mut mono[..num_samples]),
            [left, right] => self
                .reverb
                .process_stereo(&mut left[..num_samples], &mut right[..num_samples]),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamId;

    fn transparent() -> ParamSnapshot {
        ParamSnapshot::default()
            .with(ParamId::PitchDown12, 0.0)
            .with(ParamId::PitchDry, 1.0)
            .with(ParamId::PitchUp12, 0.0)
            .with(ParamId::PitchUp24, 0.0)
            .with(ParamId::ReverbWetLevel, 0.0)
            .with(ParamId::ReverbDryLevel, 1.0)
            .with(ParamId::ChorusMix, 0.0)
            .with(ParamId::DelayFeedback, 0.0)
    }

    fn prepared(inputs: usize, outputs: usize) -> EffectChain {
        let mut chain = EffectChain::new().with_channels(inputs, outputs);
        chain.prepare(1_000.0, 64).unwrap();
        chain
    }

    #[test]
    fn test_lifecycle() {
        let mut chain = EffectChain::new();
        assert_eq!(chain.status(), ChainStatus::Uninitialized);

        chain.reset();
        assert_eq!(chain.status(), ChainStatus::Uninitialized);

        chain.prepare(1_000.0, 16).unwrap();
        assert_eq!(chain.status(), ChainStatus::Prepared);

        let input = [0.0f32; 16];
        let mut left = [0.0f32; 16];
        let mut right = [0.0f32; 16];
        chain.process(&[&input[..], &input[..]], &mut [&mut left[..], &mut right[..]], &transparent());
        assert_eq!(chain.status(), ChainStatus::Processing);

        chain.reset();
        assert_eq!(chain.status(), ChainStatus::Prepared);
    }

    #[test]
    #[should_panic(expected = "before prepare")]
    fn test_process_before_prepare_panics() {
        let mut chain = EffectChain::new();
        let input = [0.0f32; 8];
        let mut out_l = [0.0f32; 8];
        let mut out_r = [0.0f32; 8];
        chain.process(
            &[&input[..], &input[..]],
            &mut [&mut out_l[..], &mut out_r[..]],
            &ParamSnapshot::default(),
        );
    }

    #[test]
    #[should_panic(expected = "exceeds prepared maximum")]
    fn test_oversized_block_panics() {
        let mut chain = prepared(1, 1);
        let mut block = vec![0.0f32; 65];
        chain.process_in_place(&mut [&mut block[..]], &ParamSnapshot::default());
    }

    #[test]
    fn test_prepare_rejects_bad_layout() {
        let mut chain = EffectChain::new().with_channels(2, 1);
        assert!(chain.prepare(48_000.0, 64).is_err());
        assert_eq!(chain.status(), ChainStatus::Uninitialized);
    }

    #[test]
    fn test_prepare_sizes_every_line() {
        let chain = prepared(1, 2);
        assert_eq!(chain.pitch().line().capacity(), 2_000);
        assert_eq!(chain.pitch().line().num_channels(), 1);
        assert_eq!(chain.echo().line().capacity(), 2_000);
        assert_eq!(chain.echo().line().num_channels(), 2);
        assert_eq!(chain.chorus().line().capacity(), 2_000);
        assert_eq!(chain.chorus().line().num_channels(), 2);
        assert_eq!(chain.reverb().sample_rate(), 1_000.0);
    }

    #[test]
    fn test_transparent_settings_pass_input() {
        let mut chain = prepared(2, 2);
        let left: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin()).collect();
        let right: Vec<f32> = (0..64).map(|i| (i as f32 * 0.7).cos() * 0.5).collect();
        let mut out_l = vec![0.0; 64];
        let mut out_r = vec![0.0; 64];
        chain.process(&[&left[..], &right[..]], &mut [&mut out_l[..], &mut out_r[..]], &transparent());
        assert_eq!(out_l, left);
        assert_eq!(out_r, right);
    }

    #[test]
    fn test_mono_input_feeds_both_outputs() {
        let mut chain = prepared(1, 2);
        let input: Vec<f32> = (0..32).map(|i| i as f32 / 32.0).collect();
        let mut left = input.clone();
        let mut right = vec![0.0; 32];
        chain.process_in_place(&mut [&mut left[..], &mut right[..]], &transparent());
        assert_eq!(left, input);
        assert_eq!(right, input);
    }

    #[test]
    fn test_in_place_matches_separate_buffers() {
        let params = ParamSnapshot::default();
        let input: Vec<f32> = (0..64).map(|i| (i as f32 * 0.11).sin()).collect();

        let mut a = prepared(2, 2);
        let mut out_l = vec![0.0; 64];
        let mut out_r = vec![0.0; 64];
        a.process(&[&input[..], &input[..]], &mut [&mut out_l[..], &mut out_r[..]], &params);

        let mut b = prepared(2, 2);
        let mut l = input.clone();
        let mut r = input.clone();
        b.process_in_place(&mut [&mut l[..], &mut r[..]], &params);

        assert_eq!(l, out_l);
        assert_eq!(r, out_r);
    }

    #[test]
    fn test_reset_message_clears_state() {
        struct Queue(Vec<ChainMessage>);
        impl MessageReceiver for Queue {
            fn pop(&mut self) -> Option<ChainMessage> {
                self.0.pop()
            }
        }

        let mut chain = prepared(1, 1);
        let mut block = vec![0.5f32; 64];
        chain.process_in_place(&mut [&mut block[..]], &ParamSnapshot::default());
        assert!(chain.echo().line().write_pos() > 0);

        chain.drain_messages(&mut Queue(vec![ChainMessage::Reset]));
        assert_eq!(chain.status(), ChainStatus::Prepared);
        assert_eq!(chain.echo().line().write_pos(), 0);
        assert_eq!(chain.pitch().cursor_positions(), [0.0; 4]);
        assert_eq!(chain.chorus().lfo_phase(), 0.0);
    }

    #[test]
    fn test_reports_latency_and_tail() {
        let chain = EffectChain::new();
        assert_eq!(chain.latency_samples(), 0);
        assert_eq!(chain.tail_seconds(), 2.0);
    }
}
