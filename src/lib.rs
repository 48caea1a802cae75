//! RLV - Resource Lifecycle Verifier
//!
//! A contract-testing harness that exercises the full lifecycle of a
//! declarative resource (create, converge, update, destroy, import) against
//! a remote backend and asserts state consistency at every transition.

pub mod backend;
pub mod fixtures;
pub mod provider;
pub mod resource;
pub mod retry;
pub mod scenarios;
pub mod state;
pub mod verifier;

mod error;

pub use backend::{Backend, BackendError, HttpBackend, MemoryBackend};
pub use error::VerifyError;
pub use resource::{ImportRule, ImportRuleSpec, Mapping, MatchPredicate, ValidationError};
pub use verifier::{AttrCheck, CaseReport, CycleFixture, LifecycleVerifier};
