use std::time::Duration;

use thiserror::Error;

use crate::backend::BackendError;
use crate::fixtures::FixtureError;
use crate::provider::ProviderError;
use crate::resource::ValidationError;
use crate::state::StateDiff;

/// Verification failures. Any variant aborts the remaining steps of the
/// enclosing test case; there is no partial-failure recovery beyond the
/// bounded readiness poll.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("attribute mismatch on {address}: '{attribute}' expected '{expected}', got {actual:?}")]
    AttributeMismatch {
        address: String,
        attribute: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("plan for '{fixture}' is not empty: {} pending change(s)", .diff.changes.len())]
    PlanNotEmpty { fixture: String, diff: StateDiff },

    #[error("resource '{name}' still exists after destroy")]
    StillExists { name: String },

    #[error("resource '{name}' did not become visible within {}s", .waited.as_secs())]
    ReadyTimeout { name: String, waited: Duration },

    #[error("resource '{address}' is missing from local state")]
    MissingFromState { address: String },
}
