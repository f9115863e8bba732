//! Analysis profiles for drumcheck.
//!
//! A profile collects every tunable of an analysis run (decay thresholds,
//! onset threshold, window lengths, shape probe placement) in a TOML file
//! with millisecond units. [`AnalysisProfile::settings`] validates it and
//! produces the [`ComparisonSettings`](drumcheck_analysis::ComparisonSettings)
//! the analysis core consumes.
//!
//! # Example
//!
//! ```rust,no_run
//! use drumcheck_config::{AnalysisProfile, default_profile_path};
//!
//! // Explicit file, else the user's profile, else built-in defaults
//! let (profile, _source) = AnalysisProfile::discover(None).unwrap();
//! let settings = profile.settings().unwrap();
//!
//! // Persist a tweaked copy as the user default
//! let tight = AnalysisProfile { max_duration_ms: 250.0, ..profile };
//! tight.save(default_profile_path()).unwrap();
//! ```

mod error;
mod profile;

/// Platform-specific configuration paths.
pub mod paths;

pub use error::ConfigError;
pub use paths::{default_profile_path, ensure_user_config_dir, user_config_dir};
pub use profile::{AnalysisProfile, ProfileSource};
