//! Drives a resource through its full lifecycle and asserts the invariants
//! of a declarative provider: attribute equality after apply, an empty plan
//! on unchanged config, absence after destroy, and equivalence after import.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::Backend;
use crate::error::VerifyError;
use crate::fixtures::FixtureSource;
use crate::provider::Provider;
use crate::resource::ImportRule;
use crate::retry::{RetryError, retry_until};

/// Cadence of the readiness poll after a direct backend create.
pub const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Overall deadline for the readiness poll.
pub const READY_POLL_DEADLINE: Duration = Duration::from_secs(5);

/// One expected attribute value, checked against local state after an apply
/// step.
#[derive(Debug, Clone)]
pub struct AttrCheck {
    pub address: String,
    pub attribute: String,
    pub expected: String,
}

impl AttrCheck {
    pub fn new(
        address: impl Into<String>,
        attribute: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            attribute: attribute.into(),
            expected: expected.into(),
        }
    }
}

/// One ordered unit of work in a create/update cycle: either apply-and-check
/// or plan-only (asserting convergence).
#[derive(Debug, Clone)]
pub struct CycleFixture {
    pub fixture: String,
    pub plan_only: bool,
    pub checks: Vec<AttrCheck>,
}

impl CycleFixture {
    pub fn apply(fixture: impl Into<String>, checks: Vec<AttrCheck>) -> Self {
        Self {
            fixture: fixture.into(),
            plan_only: false,
            checks,
        }
    }

    pub fn plan_only(fixture: impl Into<String>) -> Self {
        Self {
            fixture: fixture.into(),
            plan_only: true,
            checks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Apply,
    Plan,
    Create,
    WaitReady,
    Import,
    Destroy,
    VerifyDestroyed,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepAction::Apply => "apply",
            StepAction::Plan => "plan",
            StepAction::Create => "create",
            StepAction::WaitReady => "wait-ready",
            StepAction::Import => "import",
            StepAction::Destroy => "destroy",
            StepAction::VerifyDestroyed => "verify-destroyed",
        };
        f.write_str(name)
    }
}

/// Record of one completed step, for reporting.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub action: StepAction,
    pub subject: String,
    pub detail: String,
}

/// Record of a completed test case. Only produced when every step passed;
/// failures surface as [`VerifyError`] instead.
#[derive(Debug, Clone, Default)]
pub struct CaseReport {
    pub steps: Vec<StepOutcome>,
}

impl CaseReport {
    fn record(&mut self, action: StepAction, subject: impl Into<String>, detail: impl Into<String>) {
        self.steps.push(StepOutcome {
            action,
            subject: subject.into(),
            detail: detail.into(),
        });
    }
}

/// Exercises a single resource type's full lifecycle against a backend.
///
/// Each case owns its provider and resource names; the verifier carries no
/// ambient state beyond the backend handle and the fixture source.
pub struct LifecycleVerifier {
    backend: Arc<dyn Backend>,
    fixtures: Arc<dyn FixtureSource>,
}

impl LifecycleVerifier {
    pub fn new(backend: Arc<dyn Backend>, fixtures: Arc<dyn FixtureSource>) -> Self {
        Self { backend, fixtures }
    }

    /// Runs an ordered sequence of apply/plan-only steps, then tears the case
    /// down and verifies every created resource is gone.
    ///
    /// The first failing step aborts the remainder of the case.
    pub async fn run_create_update_cycle(
        &self,
        fixtures: Vec<CycleFixture>,
    ) -> Result<CaseReport, VerifyError> {
        let mut provider = Provider::new(self.backend.clone());
        let mut report = CaseReport::default();

        for step in fixtures {
            let config = self.fixtures.get_fixture(&step.fixture)?;

            if step.plan_only {
                tracing::info!(fixture = %step.fixture, "running plan-only step");
                let diff = provider.plan(&config).await?;
                if !diff.is_empty() {
                    return Err(VerifyError::PlanNotEmpty {
                        fixture: step.fixture,
                        diff,
                    });
                }
                report.record(StepAction::Plan, step.fixture, "no changes");
            } else {
                tracing::info!(fixture = %step.fixture, "running apply step");
                provider.apply(&config).await?;
                for check in &step.checks {
                    Self::check_attr(&provider, check)?;
                }
                report.record(
                    StepAction::Apply,
                    step.fixture,
                    format!("{} check(s) passed", step.checks.len()),
                );
            }
        }

        // Teardown: destroy everything the case created, then prove absence.
        let names: Vec<String> = provider
            .state()
            .values()
            .map(|instance| instance.id.clone())
            .collect();
        provider.destroy().await?;
        report.record(StepAction::Destroy, format!("{} resource(s)", names.len()), "");

        for name in names {
            self.check_destroyed(&name).await?;
            report.record(StepAction::VerifyDestroyed, name, "not found");
        }

        Ok(report)
    }

    /// Queries the backend for `name` after teardown. Passes only on a
    /// not-found answer; a still-present resource and a lookup failure are
    /// both errors, distinguishable by variant.
    pub async fn check_destroyed(&self, name: &str) -> Result<(), VerifyError> {
        match self.backend.get_import_rule(name).await {
            Ok(_) => Err(VerifyError::StillExists {
                name: name.to_string(),
            }),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Creates `rule` directly through the backend (bypassing the provider),
    /// waits for it to become visible, imports it via an empty resource
    /// block, and asserts the imported attributes.
    pub async fn run_import_cycle(
        &self,
        mut rule: ImportRule,
        expected: &[(&str, &str)],
    ) -> Result<CaseReport, VerifyError> {
        let mut report = CaseReport::default();

        rule.check_and_set_defaults()?;
        let name = rule.name().to_string();

        self.backend.create_import_rule(rule).await?;
        report.record(StepAction::Create, name.clone(), "created via backend");

        // The create may return before the resource is queryable.
        let backend = self.backend.clone();
        let poll_name = name.clone();
        retry_until(READY_POLL_INTERVAL, READY_POLL_DEADLINE, move || {
            let backend = backend.clone();
            let name = poll_name.clone();
            async move {
                match backend.get_import_rule(&name).await {
                    Ok(rule) => Ok(Some(rule)),
                    Err(e) if e.is_not_found() => Ok(None),
                    Err(e) => Err(e),
                }
            }
        })
        .await
        .map_err(|e| match e {
            RetryError::TimedOut { waited } => VerifyError::ReadyTimeout {
                name: name.clone(),
                waited,
            },
            RetryError::Failed(e) => VerifyError::Backend(e),
        })?;
        report.record(StepAction::WaitReady, name.clone(), "visible");

        let mut provider = Provider::new(self.backend.clone());
        let config = empty_resource_block(&name);
        let address = format!("{}.{}", ImportRule::KIND, name);
        let state = provider.import(&config, &name).await?;

        for (attribute, value) in expected {
            let actual = state.attributes.get(*attribute);
            if actual.map(String::as_str) != Some(*value) {
                return Err(VerifyError::AttributeMismatch {
                    address,
                    attribute: attribute.to_string(),
                    expected: value.to_string(),
                    actual: actual.cloned(),
                });
            }
        }
        report.record(
            StepAction::Import,
            address,
            format!("{} check(s) passed", expected.len()),
        );

        Ok(report)
    }

    fn check_attr(provider: &Provider, check: &AttrCheck) -> Result<(), VerifyError> {
        let instance =
            provider
                .state()
                .get(&check.address)
                .ok_or_else(|| VerifyError::MissingFromState {
                    address: check.address.clone(),
                })?;

        let actual = instance.attributes.get(&check.attribute);
        if actual.map(String::as_str) != Some(check.expected.as_str()) {
            return Err(VerifyError::AttributeMismatch {
                address: check.address.clone(),
                attribute: check.attribute.clone(),
                expected: check.expected.clone(),
                actual: actual.cloned(),
            });
        }

        Ok(())
    }
}

/// Terraform JSON for `resource "okta_import_rule" "<name>" { }`.
fn empty_resource_block(name: &str) -> String {
    let mut instances = serde_json::Map::new();
    instances.insert(name.to_string(), serde_json::json!({}));
    let mut types = serde_json::Map::new();
    types.insert(
        ImportRule::KIND.to_string(),
        serde_json::Value::Object(instances),
    );
    serde_json::json!({ "resource": types }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_fixture_builders() {
        let apply = CycleFixture::apply(
            "create.tf.json",
            vec![AttrCheck::new("okta_import_rule.test", "kind", "okta_import_rule")],
        );
        assert!(!apply.plan_only);
        assert_eq!(apply.checks.len(), 1);

        let plan = CycleFixture::plan_only("create.tf.json");
        assert!(plan.plan_only);
        assert!(plan.checks.is_empty());
    }

    #[test]
    fn test_empty_resource_block_shape() {
        let config = empty_resource_block("test_import");
        let doc: serde_json::Value = serde_json::from_str(&config).unwrap();
        assert_eq!(
            doc["resource"]["okta_import_rule"]["test_import"],
            serde_json::json!({})
        );
    }

    #[test]
    fn test_step_action_display() {
        assert_eq!(StepAction::Apply.to_string(), "apply");
        assert_eq!(StepAction::VerifyDestroyed.to_string(), "verify-destroyed");
    }
}
