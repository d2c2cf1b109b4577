// Melody data types
// Raw frame-domain events from extraction and optimized time-unit events for playback

use serde::{Deserialize, Serialize};

/// Run-length encoded extractor output.
/// A frequency of 0 marks a rest; `frame_count` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub frequency: u32,
    pub frame_count: u32,
}

impl RawEvent {
    pub fn silence(frame_count: u32) -> Self {
        RawEvent {
            frequency: 0,
            frame_count,
        }
    }

    pub fn tone(frequency: u32, frame_count: u32) -> Self {
        RawEvent {
            frequency,
            frame_count,
        }
    }

    pub fn is_silence(&self) -> bool {
        self.frequency == 0
    }
}

/// One step of a beeper melody, duration in playback time units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Silence { duration: f64 },
    Tone { frequency: u32, duration: f64 },
}

impl Event {
    /// Frequency in Hz as the playback routine expects it (0 for a rest)
    pub fn frequency(&self) -> u32 {
        match self {
            Event::Silence { .. } => 0,
            Event::Tone { frequency, .. } => *frequency,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            Event::Silence { duration } | Event::Tone { duration, .. } => *duration,
        }
    }

    pub fn is_silence(&self) -> bool {
        matches!(self, Event::Silence { .. })
    }
}

/// Ordered, optimized event sequence ready for an emitter.
///
/// Frequencies and durations are always read from the same event list, so
/// the two arrays handed to a playback routine are equal length and aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Melody {
    events: Vec<Event>,
}

impl Melody {
    pub fn new(events: Vec<Event>) -> Self {
        Melody { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn frequencies(&self) -> Vec<u32> {
        self.events.iter().map(Event::frequency).collect()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.events.iter().map(Event::duration).collect()
    }

    /// Sum of all durations, in time units
    pub fn total_duration(&self) -> f64 {
        self.events.iter().map(Event::duration).sum()
    }

    pub fn tone_count(&self) -> usize {
        self.events.iter().filter(|e| !e.is_silence()).count()
    }

    pub fn rest_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_silence()).count()
    }

    /// Lowest and highest tonal frequency, `None` if the melody is all rests
    pub fn frequency_range(&self) -> Option<(u32, u32)> {
        self.events
            .iter()
            .filter(|e| !e.is_silence())
            .map(Event::frequency)
            .fold(None, |range, f| match range {
                None => Some((f, f)),
                Some((lo, hi)) => Some((lo.min(f), hi.max(f))),
            })
    }
}

/// Round to one decimal place, ties to even
pub(crate) fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
