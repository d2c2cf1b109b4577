// Spectral analysis helpers
// Hann tapering and magnitude spectra for fixed-size analysis frames

use realfft::num_complex::Complex;
use realfft::{FftError, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// Build a periodic Hann window of `size` samples
pub fn hann_window(size: usize) -> Vec<f32> {
    if size == 0 {
        return Vec::new();
    }

    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
        .collect()
}

/// Center frequency in Hz of FFT bin `bin` for a frame of `window_size` samples
pub fn bin_frequency(bin: usize, sample_rate: u32, window_size: usize) -> f64 {
    if window_size == 0 {
        return 0.0;
    }
    bin as f64 * sample_rate as f64 / window_size as f64
}

/// Reusable FFT state for a fixed frame length.
///
/// The plan, window and buffers are allocated once and reused for every
/// frame, so analyzing a long recording does not re-plan the transform.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    input: Vec<f32>,
    spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(window_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(window_size);

        let input = fft.make_input_vec();
        let spectrum = fft.make_output_vec();
        let scratch = fft.make_scratch_vec();
        let magnitudes = vec![0.0; spectrum.len()];

        SpectrumAnalyzer {
            fft,
            window: hann_window(window_size),
            input,
            spectrum,
            scratch,
            magnitudes,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// Copy `frame` into the input buffer with the Hann window applied.
    /// Returns the peak absolute amplitude of the tapered frame.
    pub fn taper(&mut self, frame: &[f32]) -> f32 {
        let mut peak = 0.0f32;
        for ((dst, &sample), &w) in self.input.iter_mut().zip(frame).zip(&self.window) {
            *dst = sample * w;
            peak = peak.max(dst.abs());
        }
        peak
    }

    /// Magnitude spectrum of the most recently tapered frame.
    /// The input buffer is consumed as scratch space by the transform.
    pub fn magnitudes(&mut self) -> Result<&[f32], FftError> {
        self.fft
            .process_with_scratch(&mut self.input, &mut self.spectrum, &mut self.scratch)?;

        for (mag, c) in self.magnitudes.iter_mut().zip(&self.spectrum) {
            *mag = c.norm();
        }

        Ok(&self.magnitudes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let window = hann_window(100);

        // Window should taper at edges
        assert!(window[0] < 0.1);
        assert!(window[99] < 0.1);
        assert!(window[50] > 0.9); // Peak in middle
        assert!(hann_window(0).is_empty());
    }

    #[test]
    fn test_bin_frequency() {
        assert!((bin_frequency(44, 22050, 2205) - 440.0).abs() < 1e-9);
        assert_eq!(bin_frequency(3, 22050, 0), 0.0);
    }

    #[test]
    fn test_taper_matches_hann() {
        let mut analyzer = SpectrumAnalyzer::new(64);
        let peak = analyzer.taper(&vec![1.0; 64]);

        // Periodic Hann reaches exactly 1.0 at the center sample
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_peak_at_tone_bin() {
        let window_size = 2205;
        let mut analyzer = SpectrumAnalyzer::new(window_size);
        analyzer.taper(&sine(440.0, 22050, window_size));

        let mags = analyzer.magnitudes().unwrap();
        assert_eq!(mags.len(), window_size / 2 + 1);

        let (peak_bin, _) = mags
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(peak_bin, 44);
    }
}
