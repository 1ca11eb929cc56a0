use thiserror::Error;

/// Rejected render inputs. The pipeline itself never fails; these are
/// caught at the request boundary before any draw is taken.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtError {
    #[error("Progress must be a finite number, got {0}")]
    NonFiniteProgress(f64),
    #[error("Token ratio must be finite and non-negative, got {0}")]
    InvalidTokenRatio(f64),
}

pub type ArtResult<T> = Result<T, ArtError>;
