//! Detector configuration and the sizes derived from it.

use std::path::PathBuf;

use crate::error::{Result, VoxsegError};

/// Configuration for [`crate::Detector`].
///
/// Immutable after construction, except `threshold` which may be updated live
/// through [`crate::Detector::set_threshold`].
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Path to the Silero VAD ONNX model file.
    pub model_path: PathBuf,
    /// Sample rate of the input audio. Supported values are 8000 and 16000.
    pub sample_rate: u32,
    /// Speech probability threshold in (0, 1). A good default is 0.5.
    pub threshold: f32,
    /// Duration of silence to wait before a speech segment is finalized.
    pub min_silence_duration_ms: u32,
    /// Padding added to both segment boundaries to avoid aggressive cutting.
    pub speech_pad_ms: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("silero_vad.onnx"),
            sample_rate: 16_000,
            threshold: 0.5,
            min_silence_duration_ms: 100,
            speech_pad_ms: 30,
        }
    }
}

/// Inference window size in samples for a supported sample rate.
pub fn window_size_for_sample_rate(sample_rate: u32) -> usize {
    if sample_rate == 8_000 {
        256
    } else {
        512
    }
}

impl DetectorConfig {
    /// Validate the configuration, reporting the first invalid field.
    ///
    /// # Errors
    /// `VoxsegError::InvalidConfig` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.model_path.as_os_str().is_empty() {
            return Err(VoxsegError::InvalidConfig(
                "model_path must not be empty".into(),
            ));
        }

        if self.sample_rate != 8_000 && self.sample_rate != 16_000 {
            return Err(VoxsegError::InvalidConfig(
                "sample_rate must be 8000 or 16000".into(),
            ));
        }

        if self.threshold <= 0.0 || self.threshold >= 1.0 {
            return Err(VoxsegError::InvalidConfig(
                "threshold must be in (0, 1)".into(),
            ));
        }

        Ok(())
    }

    /// Inference window size in samples: 256 at 8 kHz, 512 at 16 kHz.
    pub fn window_size(&self) -> usize {
        window_size_for_sample_rate(self.sample_rate)
    }

    /// Minimum silence duration converted to samples.
    pub fn min_silence_samples(&self) -> usize {
        self.min_silence_duration_ms as usize * self.sample_rate as usize / 1000
    }

    /// Speech padding converted to samples.
    pub fn speech_pad_samples(&self) -> usize {
        self.speech_pad_ms as usize * self.sample_rate as usize / 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_model_path_is_rejected() {
        let cfg = DetectorConfig {
            model_path: PathBuf::new(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("model_path"));
    }

    #[test]
    fn unsupported_sample_rate_is_rejected() {
        let cfg = DetectorConfig {
            sample_rate: 44_100,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("sample_rate"));
    }

    #[test]
    fn threshold_bounds_are_exclusive() {
        for threshold in [0.0, 1.0, -0.1, 1.5] {
            let cfg = DetectorConfig {
                threshold,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "threshold={threshold}");
        }

        let cfg = DetectorConfig {
            threshold: 0.999,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn window_size_follows_sample_rate() {
        let cfg = DetectorConfig {
            sample_rate: 8_000,
            ..Default::default()
        };
        assert_eq!(cfg.window_size(), 256);

        let cfg = DetectorConfig {
            sample_rate: 16_000,
            ..Default::default()
        };
        assert_eq!(cfg.window_size(), 512);
    }

    #[test]
    fn derived_sample_counts() {
        let cfg = DetectorConfig {
            sample_rate: 16_000,
            min_silence_duration_ms: 100,
            speech_pad_ms: 30,
            ..Default::default()
        };
        assert_eq!(cfg.min_silence_samples(), 1_600);
        assert_eq!(cfg.speech_pad_samples(), 480);
    }
}
