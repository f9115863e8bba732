//! Analysis profile file format and conversion to core settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use drumcheck_analysis::compare::ShapeProbe;
use drumcheck_analysis::{AnalysisSettings, ComparisonSettings, Threshold};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths::default_profile_path;

/// Tunable parameters of an analysis run, in milliseconds and decibels.
///
/// Every field has a default, so a profile file only needs the values it
/// changes. Times are converted to samples later, with the rate of each
/// signal they are applied to.
///
/// # TOML Format
///
/// ```toml
/// name = "tight kick"
/// decay_thresholds_db = [-6.0, -12.0, -20.0, -40.0]
/// attack_threshold_db = -40.0
/// rms_window_ms = 10.0
/// onset_threshold = 0.05
/// max_duration_ms = 500.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisProfile {
    /// Name shown in reports.
    pub name: String,
    /// Decay thresholds below the peak, reported in this order.
    pub decay_thresholds_db: Vec<f64>,
    /// Threshold below the peak that marks the attack start.
    pub attack_threshold_db: f64,
    /// RMS profile window. Analysis fails on a signal whose rate makes this
    /// shorter than one sample.
    pub rms_window_ms: f64,
    /// Prefix lengths for early RMS levels.
    pub rms_levels_ms: Vec<f64>,
    /// Absolute amplitude that marks an onset.
    pub onset_threshold: f64,
    /// Cap on the aligned length; `0` compares the full common tail. A
    /// nonzero cap shorter than one sample leaves nothing to compare.
    pub max_duration_ms: f64,
    /// Start of the shape search range.
    pub shape_probe_ms: f64,
    /// Length of the shape search range.
    pub shape_span_ms: f64,
    /// Samples on each side of the shape probe centre.
    pub shape_half_width: usize,
    /// Slope spread at or below which the probe is called linear.
    pub shape_cutoff: f64,
    /// Initial-click window.
    pub transient_window_ms: f64,
    /// Length of the point-by-point trace.
    pub point_compare_ms: f64,
    /// Number of points in the trace.
    pub point_count: usize,
}

impl Default for AnalysisProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            decay_thresholds_db: vec![-6.0, -12.0, -20.0, -40.0],
            attack_threshold_db: -40.0,
            rms_window_ms: 10.0,
            rms_levels_ms: vec![50.0, 100.0, 200.0, 500.0],
            onset_threshold: 0.05,
            max_duration_ms: 500.0,
            shape_probe_ms: 20.0,
            shape_span_ms: 20.0,
            shape_half_width: 10,
            shape_cutoff: 0.001,
            transient_window_ms: 0.5,
            point_compare_ms: 6.0,
            point_count: 20,
        }
    }
}

/// Where [`AnalysisProfile::discover`] found its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// Path given on the command line.
    Explicit(PathBuf),
    /// The user's default profile file.
    User(PathBuf),
    /// No file; built-in defaults.
    Defaults,
}

impl AnalysisProfile {
    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        std::fs::write(path, self.to_toml()?).map_err(|e| ConfigError::write_file(path, e))
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pick the effective profile.
    ///
    /// An explicit path must load. Otherwise the user's default profile is
    /// used when it exists, and the built-in defaults when it does not.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, ProfileSource), ConfigError> {
        Self::discover_with(explicit, &default_profile_path())
    }

    /// [`discover`](Self::discover) with a caller-chosen user profile path.
    pub fn discover_with(
        explicit: Option<&Path>,
        user_profile: &Path,
    ) -> Result<(Self, ProfileSource), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, ProfileSource::Explicit(path.to_path_buf())));
        }
        if user_profile.is_file() {
            return Ok((
                Self::load(user_profile)?,
                ProfileSource::User(user_profile.to_path_buf()),
            ));
        }
        Ok((Self::default(), ProfileSource::Defaults))
    }

    /// Check every field, reporting the first unusable one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &db in &self.decay_thresholds_db {
            Threshold::decay(db as f32)?;
        }
        Threshold::decay(self.attack_threshold_db as f32)?;

        positive("rms_window_ms", self.rms_window_ms)?;
        for &ms in &self.rms_levels_ms {
            positive("rms_levels_ms", ms)?;
        }
        positive("onset_threshold", self.onset_threshold)?;
        non_negative("max_duration_ms", self.max_duration_ms)?;
        non_negative("shape_probe_ms", self.shape_probe_ms)?;
        positive("shape_span_ms", self.shape_span_ms)?;
        non_negative("shape_cutoff", self.shape_cutoff)?;
        positive("transient_window_ms", self.transient_window_ms)?;
        positive("point_compare_ms", self.point_compare_ms)?;

        if self.shape_half_width == 0 {
            return Err(ConfigError::invalid("shape_half_width", "must be at least 1"));
        }
        if self.point_count == 0 {
            return Err(ConfigError::invalid("point_count", "must be at least 1"));
        }
        Ok(())
    }

    /// Validate and convert to the settings the analysis core consumes.
    pub fn settings(&self) -> Result<ComparisonSettings, ConfigError> {
        self.validate()?;

        let analysis = AnalysisSettings {
            decay_thresholds: self
                .decay_thresholds_db
                .iter()
                .map(|&db| Threshold::decay(db as f32))
                .collect::<Result<_, _>>()?,
            attack_threshold: Threshold::decay(self.attack_threshold_db as f32)?,
            rms_window: millis("rms_window_ms", self.rms_window_ms)?,
        };

        let max_duration = if self.max_duration_ms == 0.0 {
            None
        } else {
            Some(millis("max_duration_ms", self.max_duration_ms)?)
        };

        Ok(ComparisonSettings {
            analysis,
            onset_threshold: self.onset_threshold as f32,
            max_duration,
            shape: ShapeProbe {
                offset: millis("shape_probe_ms", self.shape_probe_ms)?,
                span: millis("shape_span_ms", self.shape_span_ms)?,
                half_width: self.shape_half_width,
                cutoff: self.shape_cutoff as f32,
            },
            rms_levels: self
                .rms_levels_ms
                .iter()
                .map(|&ms| millis("rms_levels_ms", ms))
                .collect::<Result<_, _>>()?,
            transient_window: millis("transient_window_ms", self.transient_window_ms)?,
            point_window: millis("point_compare_ms", self.point_compare_ms)?,
            point_count: self.point_count,
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn millis(field: &'static str, ms: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(ms / 1000.0)
        .map_err(|e| ConfigError::invalid(field, e.to_string()))
}
