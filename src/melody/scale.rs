// Musical scale tables
// Discrete pitch sets that tonal estimates are snapped to

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chromatic C3..B7, integer Hz, as tuned for the reference buzzer firmware
pub const CHROMATIC_C3_B7: [u32; 60] = [
    131, 139, 147, 156, 165, 175, 185, 196, 208, 220, 233, 247, // C3-B3
    262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494, // C4-B4
    523, 554, 587, 622, 659, 698, 740, 784, 831, 880, 932, 988, // C5-B5
    1047, 1109, 1175, 1245, 1319, 1397, 1480, 1568, 1661, 1760, 1865, 1976, // C6-B6
    2093, 2217, 2349, 2489, 2637, 2794, 2960, 3136, 3322, 3520, 3729, 3951, // C7-B7
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScaleError {
    #[error("scale has no notes")]
    Empty,

    #[error("scale contains a 0 Hz note")]
    ZeroFrequency,

    #[error("scale is not strictly ascending at index {0}")]
    NotAscending(usize),

    #[error("base frequency must be positive, got {0}")]
    InvalidBase(f64),

    #[error("{0} octaves run past the largest representable frequency")]
    TooManyOctaves(u32),
}

/// Validated, strictly ascending set of admissible tone frequencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Scale {
    notes: Vec<u32>,
}

impl Scale {
    pub fn new(notes: Vec<u32>) -> Result<Self, ScaleError> {
        if notes.is_empty() {
            return Err(ScaleError::Empty);
        }
        if notes.contains(&0) {
            return Err(ScaleError::ZeroFrequency);
        }
        if let Some(i) = notes.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ScaleError::NotAscending(i + 1));
        }
        Ok(Scale { notes })
    }

    /// The five-octave chromatic table (C3..B7)
    pub fn chromatic_c3_b7() -> Self {
        Scale {
            notes: CHROMATIC_C3_B7.to_vec(),
        }
    }

    /// Twelve-tone equal temperament starting at `base_hz`, rounded to whole Hz
    pub fn equal_tempered(base_hz: f64, octaves: u32) -> Result<Self, ScaleError> {
        if !(base_hz.is_finite() && base_hz > 0.0) {
            return Err(ScaleError::InvalidBase(base_hz));
        }

        let steps = octaves
            .checked_mul(12)
            .filter(|_| base_hz * 2f64.powf(octaves as f64) <= u32::MAX as f64)
            .ok_or(ScaleError::TooManyOctaves(octaves))?;

        let notes = (0..steps)
            .map(|step| (base_hz * 2f64.powf(step as f64 / 12.0)).round() as u32)
            .collect();
        Scale::new(notes)
    }

    pub fn notes(&self) -> &[u32] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Closest note to `frequency`; equidistant candidates resolve to the lower note
    pub fn nearest(&self, frequency: u32) -> u32 {
        let idx = self.notes.partition_point(|&note| note < frequency);

        let above = self.notes.get(idx).copied();
        let below = idx.checked_sub(1).map(|i| self.notes[i]);

        match (below, above) {
            (Some(lo), Some(hi)) if frequency - lo <= hi - frequency => lo,
            (_, Some(hi)) => hi,
            (Some(lo), None) => lo,
            // Unreachable for a validated scale
            (None, None) => frequency,
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale::chromatic_c3_b7()
    }
}

impl TryFrom<Vec<u32>> for Scale {
    type Error = ScaleError;

    fn try_from(notes: Vec<u32>) -> Result<Self, Self::Error> {
        Scale::new(notes)
    }
}

impl From<Scale> for Vec<u32> {
    fn from(scale: Scale) -> Self {
        scale.notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let scale = Scale::default();
        assert_eq!(scale.len(), 60);
        assert_eq!(scale.notes()[0], 131);
        assert_eq!(scale.notes()[59], 3951);
        assert!(Scale::new(CHROMATIC_C3_B7.to_vec()).is_ok());
    }

    #[test]
    fn test_nearest() {
        let scale = Scale::default();
        assert_eq!(scale.nearest(440), 440);
        assert_eq!(scale.nearest(450), 440);
        assert_eq!(scale.nearest(460), 466);
        assert_eq!(scale.nearest(10), 131);
        assert_eq!(scale.nearest(9000), 3951);
    }

    #[test]
    fn test_nearest_tie_prefers_lower() {
        let scale = Scale::new(vec![100, 200]).unwrap();
        assert_eq!(scale.nearest(150), 100);
        assert_eq!(scale.nearest(151), 200);
    }

    #[test]
    fn test_validation() {
        assert_eq!(Scale::new(vec![]), Err(ScaleError::Empty));
        assert_eq!(Scale::new(vec![0, 100]), Err(ScaleError::ZeroFrequency));
        assert_eq!(Scale::new(vec![100, 300, 200]), Err(ScaleError::NotAscending(2)));
        assert_eq!(Scale::new(vec![100, 100]), Err(ScaleError::NotAscending(1)));
    }

    #[test]
    fn test_equal_tempered() {
        let scale = Scale::equal_tempered(220.0, 2).unwrap();
        assert_eq!(scale.len(), 24);
        assert_eq!(scale.notes()[0], 220);
        assert_eq!(scale.notes()[12], 440);
        assert_eq!(scale.notes()[23], 831);

        assert!(matches!(
            Scale::equal_tempered(0.0, 2),
            Err(ScaleError::InvalidBase(_))
        ));
        assert_eq!(Scale::equal_tempered(440.0, 0), Err(ScaleError::Empty));
    }

    #[test]
    fn test_equal_tempered_rejects_huge_octave_counts() {
        assert_eq!(
            Scale::equal_tempered(440.0, u32::MAX),
            Err(ScaleError::TooManyOctaves(u32::MAX))
        );
        // 440 * 2^24 is past u32::MAX even though 24 * 12 steps fit
        assert_eq!(
            Scale::equal_tempered(440.0, 24),
            Err(ScaleError::TooManyOctaves(24))
        );
        assert_eq!(Scale::equal_tempered(20.0, 10).unwrap().len(), 120);
    }

    #[test]
    fn test_deserialize_validates() {
        let scale: Scale = serde_json::from_str("[262, 294, 330]").unwrap();
        assert_eq!(scale.notes(), &[262, 294, 330]);
        assert!(serde_json::from_str::<Scale>("[330, 262]").is_err());
    }
}
