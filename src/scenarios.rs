//! Built-in conformance scenarios for the `okta_import_rule` resource.
//!
//! These are the canonical cases the CLI runs against a live backend; the
//! integration tests run the same functions against the in-memory backend.

use std::collections::BTreeMap;

use crate::error::VerifyError;
use crate::resource::{ImportRule, ImportRuleSpec, Mapping, MatchPredicate};
use crate::verifier::{AttrCheck, CaseReport, CycleFixture, LifecycleVerifier};

pub const CREATE_FIXTURE: &str = "okta_import_rule_0_create.tf.json";
pub const UPDATE_FIXTURE: &str = "okta_import_rule_1_update.tf.json";

const ADDRESS: &str = "okta_import_rule.test";

/// Create, converge, update, converge, destroy, verify absence.
pub async fn import_rule_lifecycle(
    verifier: &LifecycleVerifier,
) -> Result<CaseReport, VerifyError> {
    let kind_check = || vec![AttrCheck::new(ADDRESS, "kind", ImportRule::KIND)];

    verifier
        .run_create_update_cycle(vec![
            CycleFixture::apply(CREATE_FIXTURE, kind_check()),
            CycleFixture::plan_only(CREATE_FIXTURE),
            CycleFixture::apply(UPDATE_FIXTURE, kind_check()),
            CycleFixture::plan_only(UPDATE_FIXTURE),
        ])
        .await
}

/// Create directly via the backend, wait for visibility, import through an
/// empty resource block, and verify the imported state.
pub async fn import_rule_import(verifier: &LifecycleVerifier) -> Result<CaseReport, VerifyError> {
    verifier
        .run_import_cycle(sample_import_rule("test_import"), &[("kind", ImportRule::KIND)])
        .await
}

/// The rule the import scenario registers out-of-band: priority 100, one
/// mapping labeling by app IDs and one by group IDs.
pub fn sample_import_rule(name: &str) -> ImportRule {
    let ids = || vec!["1".to_string(), "2".to_string(), "3".to_string()];

    ImportRule::new(
        name,
        ImportRuleSpec {
            priority: 100,
            mappings: vec![
                Mapping {
                    add_labels: BTreeMap::from([("label1".to_string(), "value1".to_string())]),
                    matches: vec![MatchPredicate {
                        app_ids: ids(),
                        group_ids: vec![],
                    }],
                },
                Mapping {
                    add_labels: BTreeMap::from([("label2".to_string(), "value2".to_string())]),
                    matches: vec![MatchPredicate {
                        app_ids: vec![],
                        group_ids: ids(),
                    }],
                },
            ],
        },
    )
}
