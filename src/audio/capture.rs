// src/audio/capture.rs
//! Analysis tap: a wrapper source that feeds samples into the shared ring
//! buffer and reports end-of-stream to the routing graph.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use ringbuf::{HeapRb, traits::*};
use rodio::Source;

/// Events the tap reports back to the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent {
    /// The wrapped source ran out of samples (track ended).
    Ended,
}

/// A wrapper source that captures samples into the analysis ring buffer
/// while passing them through unchanged, and emits a single `Ended` event
/// when the underlying source is exhausted.
pub struct AnalysisTap<S> {
    source: S,
    buffer: Arc<Mutex<HeapRb<f32>>>,
    events: Sender<TapEvent>,
    ended_sent: bool,
}

impl<S> AnalysisTap<S> {
    pub fn new(source: S, buffer: Arc<Mutex<HeapRb<f32>>>, events: Sender<TapEvent>) -> Self {
        Self {
            source,
            buffer,
            events,
            ended_sent: false,
        }
    }
}

impl<S> Iterator for AnalysisTap<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        match self.source.next() {
            Some(sample) => {
                // Push into the ring buffer, dropping the oldest when full.
                if let Ok(mut buf) = self.buffer.lock() {
                    if buf.is_full() {
                        let _ = buf.try_pop();
                    }
                    let _ = buf.try_push(sample);
                }
                Some(sample)
            }
            None => {
                if !self.ended_sent {
                    self.ended_sent = true;
                    let _ = self.events.send(TapEvent::Ended);
                }
                None
            }
        }
    }
}

impl<S> Source for AnalysisTap<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<std::time::Duration> {
        self.source.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use rodio::source::SineWave;

    use super::*;

    #[test]
    fn captures_samples_and_passes_them_through() {
        let buffer = Arc::new(Mutex::new(HeapRb::<f32>::new(1024)));
        let (tx, _rx) = mpsc::channel();
        let source = SineWave::new(440.0).take_duration(Duration::from_millis(10));
        let mut tap = AnalysisTap::new(source, buffer.clone(), tx);

        let passed: Vec<f32> = tap.by_ref().take(256).collect();
        assert_eq!(passed.len(), 256);
        let captured = buffer.lock().unwrap().occupied_len();
        assert_eq!(captured, 256);
    }

    #[test]
    fn emits_ended_exactly_once() {
        let buffer = Arc::new(Mutex::new(HeapRb::<f32>::new(64)));
        let (tx, rx) = mpsc::channel();
        let source = SineWave::new(440.0).take_duration(Duration::from_millis(1));
        let mut tap = AnalysisTap::new(source, buffer, tx);

        while tap.next().is_some() {}
        // Extra pulls after exhaustion must not resend the event.
        assert!(tap.next().is_none());
        assert!(tap.next().is_none());

        assert_eq!(rx.try_recv(), Ok(TapEvent::Ended));
        assert!(rx.try_recv().is_err());
    }
}
