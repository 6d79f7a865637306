//! Circular delay line shared by the pitch, echo and chorus stages.

/*
Circular Delay Line
===================

A fixed-capacity ring of sample history, one lane per channel. A single write
cursor moves forward one slot per sample; any number of read cursors look back
into the history at integer or fractional positions.

    capacity = 8, write cursor at 5

      index:   0   1   2   3   4   5   6   7
             [ . | . | . | . | . | W | . | . ]
                               ^       ^
                       1 behind W     7 behind W (wraps through 0)

Per-sample protocol
-------------------

  1. write(channel, sample) for every channel
  2. read / read_linear at any position
  3. advance_write() exactly once

Reads between (1) and (3) see the current sample at the write cursor, so a
cursor sitting exactly on the write position has zero latency.

Fractional reads
----------------

  position 41.25  ->  0.75 * x[41] + 0.25 * x[42]

The second index wraps to 0 when the first is the last slot, keeping the ring
continuous. Read cursors are f64 so that positions near the end of a
two-second buffer at high sample rates keep sub-sample resolution.
*/

/// Multi-channel ring buffer with one write cursor.
///
/// Storage is sized once by [`CircularDelayLine::resize`] and never
/// reallocated by reads, writes or [`CircularDelayLine::clear`].
#[derive(Debug, Clone)]
pub struct CircularDelayLine {
    lanes: Vec<Vec<f32>>,
    capacity: usize,
    write_pos: usize,
}

impl CircularDelayLine {
    /// Create a delay line with `num_channels` lanes of `capacity` samples.
    ///
    /// Capacity is raised to at least one sample so every index operation
    /// stays total.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lanes: vec![vec![0.0; capacity]; num_channels],
            capacity,
            write_pos: 0,
        }
    }

    /// Reallocate to a new shape. Destroys history and rewinds the cursor.
    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        *self = Self::new(num_channels, capacity);
    }

    /// Zero all history and rewind the write cursor without reallocating.
    pub fn clear(&mut self) {
        for lane in &mut self.lanes {
            lane.fill(0.0);
        }
        self.write_pos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn num_channels(&self) -> usize {
        self.lanes.len()
    }

    pub fn write_pos(&self) -> usize {
        self.write_pos
    }

    /// Store `sample` at the write cursor of `channel`.
    #[inline]
    pub fn write(&mut self, channel: usize, sample: f32) {
        self.lanes[channel][self.write_pos] = sample;
    }

    /// Read the stored sample at an integer index (wrapped into range).
    #[inline]
    pub fn read(&self, channel: usize, index: usize) -> f32 {
        self.lanes[channel][index % self.capacity]
    }

    /// Linearly interpolated read at a fractional position.
    ///
    /// Positions outside `[0, capacity)` are clamped into range rather than
    /// reported; callers wrap their cursors first.
    #[inline]
    pub fn read_linear(&self, channel: usize, position: f64) -> f32 {
        let len = self.capacity as f64;
        let position = if position >= 0.0 && position < len {
            position
        } else if position >= len {
            len - 1.0
        } else {
            0.0
        };

        let index_a = position as usize;
        let mut index_b = index_a + 1;
        if index_b >= self.capacity {
            index_b -= self.capacity;
        }
        let frac = (position - index_a as f64) as f32;

        let lane = &self.lanes[channel];
        let a = lane[index_a];
        let b = lane[index_b];
        a + frac * (b - a)
    }

    /// Index of the slot `delay` samples behind the write cursor.
    ///
    /// A delay of zero (or a whole multiple of the capacity) lands on the
    /// write cursor itself.
    #[inline]
    pub fn tap_behind(&self, delay: usize) -> usize {
        (self.write_pos + self.capacity - delay % self.capacity) % self.capacity
    }

    /// Fractional position `delay` samples behind the write cursor.
    #[inline]
    pub fn position_behind(&self, delay: f64) -> f64 {
        self.wrap(self.write_pos as f64 - delay)
    }

    /// Wrap an arbitrary position into `[0, capacity)`.
    #[inline]
    pub fn wrap(&self, position: f64) -> f64 {
        let len = self.capacity as f64;
        let wrapped = position.rem_euclid(len);
        // rem_euclid can round up to exactly `len` for tiny negative inputs
        if wrapped >= len {
            wrapped - len
        } else {
            wrapped
        }
    }

    /// Move the write cursor forward one slot.
    #[inline]
    pub fn advance_write(&mut self) {
        self.write_pos += 1;
        if self.write_pos >= self.capacity {
            self.write_pos = 0;
        }
    }
}

impl Default for CircularDelayLine {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

/// An independent fractional read head that moves by a fixed step per sample.
///
/// Cursors hold no reference to the line they read; the owner passes the
/// line's capacity when advancing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadCursor {
    position: f64,
    step: f64,
}

impl ReadCursor {
    pub const fn new(step: f64) -> Self {
        Self {
            position: 0.0,
            step,
        }
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Advance by one step, wrapping by subtraction into `[0, capacity)`.
    #[inline]
    pub fn advance(&mut self, capacity: usize) {
        let len = capacity as f64;
        self.position += self.step;
        while self.position >= len {
            self.position -= len;
        }
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
    }
}
