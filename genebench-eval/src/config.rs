use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::MatchPolicy;

pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

#[derive(Error, Debug)]
pub enum EvalConfigError {
    #[error("IoU threshold must be in (0, 1], got {0}")]
    InvalidIouThreshold(f64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type EvalConfigResult<T> = std::result::Result<T, EvalConfigError>;

fn default_iou_threshold() -> f64 {
    DEFAULT_IOU_THRESHOLD
}

fn default_strand_aware() -> bool {
    true
}

///
/// Settings for one evaluation run. Every field has a default, so an empty
/// TOML file is a valid configuration.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Minimum IoU for an overlap-policy exon match.
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,
    /// Policy that drives exon sensitivity and precision.
    #[serde(default)]
    pub exon_policy: MatchPolicy,
    /// Bases added on each side of a derived nucleotide span.
    #[serde(default)]
    pub flank: u32,
    /// When false, strand is ignored at every level.
    #[serde(default = "default_strand_aware")]
    pub strand_aware: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            exon_policy: MatchPolicy::default(),
            flank: 0,
            strand_aware: true,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> EvalConfigResult<()> {
        if !(self.iou_threshold > 0.0 && self.iou_threshold <= 1.0) {
            return Err(EvalConfigError::InvalidIouThreshold(self.iou_threshold));
        }
        Ok(())
    }
}

impl TryFrom<&str> for EvaluationConfig {
    type Error = EvalConfigError;

    fn try_from(toml_str: &str) -> Result<Self, Self::Error> {
        let config: EvaluationConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<&Path> for EvaluationConfig {
    type Error = EvalConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        EvaluationConfig::try_from(toml_str.as_str())
    }
}
