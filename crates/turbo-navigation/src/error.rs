//! Navigation error types.

use thiserror::Error;
use turbo_facets::FacetError;

/// Errors raised while assembling a listing session.
///
/// State transitions themselves are total; only setup can fail.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Navigation configuration is unusable.
    #[error("Invalid navigation configuration: {0}")]
    InvalidConfig(String),

    /// The skeleton timer needs a tokio runtime to schedule its delay.
    #[error("No tokio runtime available for the skeleton timer")]
    NoRuntime,

    /// Error from the facet layer.
    #[error(transparent)]
    Facet(#[from] FacetError),
}
