use crate::{
    dsp::delay::{CircularDelayLine, ReadCursor},
    MAX_CHANNELS,
};

use super::Frame;

/*
Pitch Voice Bank
================

Four playback heads read one shared history at different speeds:

    voice   ratio   interval
      0      0.5    octave down
      1      1.0    unison (dry)
      2      2.0    octave up
      3      4.0    two octaves up

The write cursor moves one slot per sample; a voice's read cursor moves
`ratio` slots. Reading faster than writing plays the history back faster,
raising the pitch. Heads that outrun the write cursor lap the ring and read
older history, which is where the characteristic splice artifacts of this
shifter come from.

Voice 1 never reads the line. Its weight is applied to the untouched input
later in the chain, so the dry signal carries no extra latency.
*/

/// Playback ratios, one per voice.
pub const PITCH_RATIOS: [f32; NUM_VOICES] = [0.5, 1.0, 2.0, 4.0];
/// Index of the unison voice handled as the dry path.
pub const DRY_VOICE: usize = 1;
pub const NUM_VOICES: usize = 4;

/// Shared pitch delay line plus one read cursor per voice.
#[derive(Debug, Clone)]
pub struct PitchVoiceBank {
    line: CircularDelayLine,
    cursors: [ReadCursor; NUM_VOICES],
}

impl PitchVoiceBank {
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            line: CircularDelayLine::new(num_channels, capacity),
            cursors: PITCH_RATIOS.map(|ratio| ReadCursor::new(ratio as f64)),
        }
    }

    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        self.line.resize(num_channels, capacity);
        self.reset_cursors();
    }

    pub fn reset(&mut self) {
        self.line.clear();
        self.reset_cursors();
    }

    fn reset_cursors(&mut self) {
        for cursor in &mut self.cursors {
            cursor.reset();
        }
    }

    pub fn line(&self) -> &CircularDelayLine {
        &self.line
    }

    pub fn cursor_positions(&self) -> [f64; NUM_VOICES] {
        self.cursors.map(|c| c.position())
    }

    /// Run one sample through the bank and return the wet sum per channel.
    ///
    /// `input` carries `self.line.num_channels()` live channels; any further
    /// output channel gets no wet signal.
    #[inline]
    pub fn process_frame(&mut self, input: &Frame, weights: &[f32; NUM_VOICES]) -> Frame {
        let channels = self.line.num_channels().min(MAX_CHANNELS);
        for (ch, &sample) in input.iter().enumerate().take(channels) {
            self.line.write(ch, sample);
        }

        let mut wet = [0.0; MAX_CHANNELS];
        for (voice, cursor) in self.cursors.iter().enumerate() {
            if voice == DRY_VOICE {
                continue;
            }
            let weight = weights[voice];
            for (ch, acc) in wet.iter_mut().enumerate().take(channels) {
                *acc += self.line.read_linear(ch, cursor.position()) * weight;
            }
        }

        let capacity = self.line.capacity();
        for cursor in &mut self.cursors {
            cursor.advance(capacity);
        }
        self.line.advance_write();

        wet
    }
}
