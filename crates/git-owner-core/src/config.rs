use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OwnerError;
use crate::types::IdentityMode;

/// Top-level configuration loaded from `.git-owner.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use git_owner_core::OwnerConfig;
///
/// let config = OwnerConfig::default();
/// assert_eq!(config.weights.blame_weight_coefficient, 0.7);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Weighting between blame and log.
    #[serde(default)]
    pub weights: WeightConfig,
    /// How authors are identified.
    #[serde(default)]
    pub identity: IdentityConfig,
}

impl OwnerConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerError::Io`] if the file cannot be read,
    /// [`OwnerError::Toml`] if the content is not valid TOML, or
    /// [`OwnerError::Config`] if the weights are out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use git_owner_core::OwnerConfig;
    /// use std::path::Path;
    ///
    /// let config = OwnerConfig::from_file(Path::new(".git-owner.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, OwnerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerError::Toml`] if parsing fails, or
    /// [`OwnerError::Config`] if the weights are out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_owner_core::OwnerConfig;
    ///
    /// let toml = r#"
    /// [weights]
    /// blame_weight_coefficient = 0.5
    /// "#;
    /// let config = OwnerConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.weights.blame_weight_coefficient, 0.5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, OwnerError> {
        let config: Self = toml::from_str(content)?;
        config.weights.validate()?;
        Ok(config)
    }
}

/// Weighting parameters for the ownership estimator.
///
/// `combined = c * blame + (1 - c) * commits` with
/// `c = blame_weight_coefficient`. With recency decay enabled each commit
/// counts `decay_factor ^ (age_days / decay_half_life_days)`.
///
/// # Examples
///
/// ```
/// use git_owner_core::WeightConfig;
///
/// let config = WeightConfig::default();
/// assert_eq!(config.blame_weight_coefficient, 0.7);
/// assert!(!config.recency_decay_enabled);
/// assert_eq!(config.decay_half_life_days, 90.0);
/// assert_eq!(config.decay_factor, 0.5);
/// assert!(config.top_n.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Share of the blame signal in `[0, 1]` (default: 0.7).
    #[serde(default = "default_blame_weight_coefficient")]
    pub blame_weight_coefficient: f64,
    /// Weight recent commits more than old ones (default: false).
    #[serde(default)]
    pub recency_decay_enabled: bool,
    /// Age in days at which a commit counts `decay_factor` (default: 90).
    #[serde(default = "default_decay_half_life_days")]
    pub decay_half_life_days: f64,
    /// Decay base in `(0, 1]` (default: 0.5).
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,
    /// Retain only the first N ranked authors (default: all).
    #[serde(default)]
    pub top_n: Option<usize>,
}

fn default_blame_weight_coefficient() -> f64 {
    0.7
}

fn default_decay_half_life_days() -> f64 {
    90.0
}

fn default_decay_factor() -> f64 {
    0.5
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            blame_weight_coefficient: default_blame_weight_coefficient(),
            recency_decay_enabled: false,
            decay_half_life_days: default_decay_half_life_days(),
            decay_factor: default_decay_factor(),
            top_n: None,
        }
    }
}

impl WeightConfig {
    /// Check that every parameter is within its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`OwnerError::Config`] naming the first offending parameter.
    ///
    /// # Examples
    ///
    /// ```
    /// use git_owner_core::WeightConfig;
    ///
    /// let config = WeightConfig {
    ///     blame_weight_coefficient: 1.5,
    ///     ..WeightConfig::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), OwnerError> {
        let c = self.blame_weight_coefficient;
        if !(0.0..=1.0).contains(&c) {
            return Err(OwnerError::Config(format!(
                "blame_weight_coefficient must be within [0, 1], got {c}"
            )));
        }
        let half_life = self.decay_half_life_days;
        if !half_life.is_finite() || half_life <= 0.0 {
            return Err(OwnerError::Config(format!(
                "decay_half_life_days must be a positive number, got {half_life}"
            )));
        }
        let factor = self.decay_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(OwnerError::Config(format!(
                "decay_factor must be within (0, 1], got {factor}"
            )));
        }
        if self.top_n == Some(0) {
            return Err(OwnerError::Config("top_n must be at least 1".into()));
        }
        Ok(())
    }
}

/// Author identity configuration.
///
/// # Examples
///
/// ```
/// use git_owner_core::{IdentityConfig, IdentityMode};
///
/// let config = IdentityConfig::default();
/// assert_eq!(config.mode, IdentityMode::Email);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Identify authors by email (default) or by name.
    #[serde(default)]
    pub mode: IdentityMode,
}
