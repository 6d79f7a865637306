#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Control requests delivered to the audio thread between blocks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ChainMessage {
    /// Clear delay lines, LFO and reverb tail (transport stop / loop).
    Reset,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ChainMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ChainMessage> {
    fn pop(&mut self) -> Option<ChainMessage> {
        Consumer::pop(self).ok()
    }
}
