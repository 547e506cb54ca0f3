use thiserror::Error;

use genebench_core::errors::GeneModelError;

use crate::config::EvalConfigError;

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Malformed gene model: {0}")]
    MalformedGeneModel(#[from] GeneModelError),
    #[error(transparent)]
    Config(#[from] EvalConfigError),
}
