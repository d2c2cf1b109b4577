// Conversion report
// Summary of one conversion run, logged by the CLI and optionally written as JSON

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::melody::{Melody, RawEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Sample rate the buffer was analyzed at
    pub sample_rate: u32,

    /// Analysis frames covered by the raw events
    pub frames_analyzed: u64,

    /// Events produced by the extractor, before optimization
    pub raw_event_count: usize,

    /// Events in the final melody
    pub event_count: usize,
    pub tone_count: usize,
    pub rest_count: usize,

    /// Lowest and highest tone in Hz, absent for an all-rest melody
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_range: Option<(u32, u32)>,

    /// Sum of durations, in playback time units
    pub total_duration: f64,

    /// Events cut off by the maximum event count
    pub truncated_events: usize,
}

impl ConversionReport {
    pub fn new(sample_rate: u32, raw: &[RawEvent], melody: &Melody, truncated_events: usize) -> Self {
        ConversionReport {
            sample_rate,
            frames_analyzed: raw.iter().map(|e| e.frame_count as u64).sum(),
            raw_event_count: raw.len(),
            event_count: melody.len(),
            tone_count: melody.tone_count(),
            rest_count: melody.rest_count(),
            frequency_range: melody.frequency_range(),
            total_duration: melody.total_duration(),
            truncated_events,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events ({} tones + {} rests) from {} frames",
            self.event_count, self.tone_count, self.rest_count, self.frames_analyzed
        )?;
        match self.frequency_range {
            Some((lo, hi)) => write!(f, ", {} - {} Hz", lo, hi)?,
            None => write!(f, ", silence only")?,
        }
        write!(f, ", {:.1} time units", self.total_duration)?;
        if self.truncated_events > 0 {
            write!(f, ", {} events truncated", self.truncated_events)?;
        }
        Ok(())
    }
}
