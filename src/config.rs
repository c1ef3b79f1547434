// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Triangulation configuration

use crate::error::{TriangulateError, TriangulateResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default config file looked up in the working directory
pub const CONFIG_FILE: &str = "tritarget.toml";

/// Settings for one triangulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulateConfig {
    /// Maximum distance to search for the target surface; `<= 0` searches without limit
    pub max_distance: f64,
    /// Quads whose diagonal midpoints are at most this far apart stay quads
    pub planarity_threshold: f64,
    /// Corner-to-plane distance under which a face counts as nearly coplanar
    pub coplanar_tolerance: f64,
    /// Multiplier applied to measured distances of nearly coplanar faces
    pub coplanar_penalty: f64,
    /// Also cast against the face normal, not only along it
    pub cast_both_directions: bool,
    /// Only process selected faces
    pub selected_only: bool,
}

impl Default for TriangulateConfig {
    fn default() -> Self {
        Self {
            max_distance: 1.0,
            planarity_threshold: 0.001,
            coplanar_tolerance: 1e-5,
            coplanar_penalty: 1.10,
            cast_both_directions: false,
            selected_only: false,
        }
    }
}

impl TriangulateConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: TriangulateConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `tritarget.toml` from the working directory if present, then
    /// apply environment variable overrides
    pub fn load() -> Result<Self> {
        let default_path = PathBuf::from(CONFIG_FILE);
        let explicit = default_path.exists().then_some(default_path.as_path());
        Self::load_from(explicit)
    }

    /// Load from an explicit file (or defaults), then apply environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(value) = env_override("TRITARGET_MAX_DISTANCE") {
            config.max_distance = value;
        }
        if let Some(value) = env_override("TRITARGET_PLANARITY_THRESHOLD") {
            config.planarity_threshold = value;
        }
        if let Some(both) = env_override("TRITARGET_BOTH_DIRECTIONS") {
            config.cast_both_directions = both;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject settings that would make the decision procedure meaningless
    pub fn validate(&self) -> TriangulateResult<()> {
        if self.max_distance.is_nan() {
            return Err(invalid("max_distance", self.max_distance, "must be a number"));
        }
        if !(self.planarity_threshold >= 0.0 && self.planarity_threshold.is_finite()) {
            return Err(invalid(
                "planarity_threshold",
                self.planarity_threshold,
                "must be finite and >= 0",
            ));
        }
        if !(self.coplanar_tolerance >= 0.0 && self.coplanar_tolerance.is_finite()) {
            return Err(invalid(
                "coplanar_tolerance",
                self.coplanar_tolerance,
                "must be finite and >= 0",
            ));
        }
        if !(self.coplanar_penalty > 0.0 && self.coplanar_penalty.is_finite()) {
            return Err(invalid(
                "coplanar_penalty",
                self.coplanar_penalty,
                "must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Search radius, or `None` for an unbounded search
    pub fn search_radius(&self) -> Option<f64> {
        (self.max_distance > 0.0).then_some(self.max_distance)
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> TriangulateError {
    TriangulateError::InvalidParameter {
        name,
        value,
        reason,
    }
}

fn env_override<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = TriangulateConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search_radius(), Some(1.0));
    }

    #[test]
    fn test_non_positive_max_distance_is_unbounded() {
        let mut config = TriangulateConfig::default();
        config.max_distance = 0.0;
        assert_eq!(config.search_radius(), None);
        config.max_distance = -3.0;
        assert_eq!(config.search_radius(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = TriangulateConfig {
            planarity_threshold: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TriangulateError::InvalidParameter {
                name: "planarity_threshold",
                ..
            })
        ));

        let config = TriangulateConfig {
            coplanar_penalty: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TriangulateConfig {
            max_distance: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_partial_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), "planarity_threshold = 0.01\n")?;

        let config = TriangulateConfig::from_file(file.path())?;
        assert_eq!(config.planarity_threshold, 0.01);
        assert_eq!(config.max_distance, 1.0);

        let custom = TriangulateConfig {
            max_distance: 0.0,
            cast_both_directions: true,
            ..Default::default()
        };
        custom.save(file.path())?;
        assert_eq!(TriangulateConfig::from_file(file.path())?, custom);
        Ok(())
    }

    #[test]
    fn test_env_override_ignores_unparsable_values() {
        std::env::set_var("TRITARGET_TEST_FLAG", "yes");
        assert_eq!(env_override::<bool>("TRITARGET_TEST_FLAG"), None);
        std::env::set_var("TRITARGET_TEST_FLAG", " true ");
        assert_eq!(env_override::<bool>("TRITARGET_TEST_FLAG"), Some(true));
        std::env::set_var("TRITARGET_TEST_FLAG", "0.25");
        assert_eq!(env_override::<f64>("TRITARGET_TEST_FLAG"), Some(0.25));
        std::env::remove_var("TRITARGET_TEST_FLAG");
        assert_eq!(env_override::<bool>("TRITARGET_TEST_FLAG"), None);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "max_distance = \"far\"").unwrap();
        let err = TriangulateConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
