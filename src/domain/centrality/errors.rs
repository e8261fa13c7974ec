//! Centrality Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CentralityError {
    #[error("Singular linear system (pivot {pivot:e})")]
    SingularSystem { pivot: f64 },

    #[error("{metric} did not converge")]
    NotConverged { metric: String },

    #[error("Reference {metric} failed: {message}")]
    Reference { metric: String, message: String },
}
