//! Local mirror of remote state, compared against the backend for drift.

use std::collections::BTreeMap;

use crate::resource::ImportRule;

/// Flattened state of a single managed resource instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceState {
    pub id: String,
    pub attributes: BTreeMap<String, String>,
}

impl InstanceState {
    pub fn from_rule(rule: &ImportRule) -> Self {
        let mut attributes = rule.attributes();
        attributes.insert("id".to_string(), rule.name().to_string());
        Self {
            id: rule.name().to_string(),
            attributes,
        }
    }
}

/// One pending attribute change in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeChange {
    pub address: String,
    pub key: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// The outcome of a plan. An empty diff means the configuration has
/// converged: re-applying it would change nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDiff {
    pub changes: Vec<AttributeChange>,
}

impl StateDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn extend(&mut self, changes: Vec<AttributeChange>) {
        self.changes.extend(changes);
    }
}

/// Compares actual (remote) attributes against desired (configured) ones.
pub fn diff_attributes(
    address: &str,
    actual: &BTreeMap<String, String>,
    desired: &BTreeMap<String, String>,
) -> Vec<AttributeChange> {
    let mut changes = Vec::new();

    for (key, new) in desired {
        match actual.get(key) {
            Some(old) if old == new => {}
            old => changes.push(AttributeChange {
                address: address.to_string(),
                key: key.clone(),
                old: old.cloned(),
                new: Some(new.clone()),
            }),
        }
    }

    for (key, old) in actual {
        if !desired.contains_key(key) {
            changes.push(AttributeChange {
                address: address.to_string(),
                key: key.clone(),
                old: Some(old.clone()),
                new: None,
            });
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_diff_equal_maps_is_empty() {
        let a = attrs(&[("kind", "okta_import_rule"), ("spec.priority", "100")]);
        assert!(diff_attributes("okta_import_rule.test", &a, &a).is_empty());
    }

    #[test]
    fn test_diff_changed_value() {
        let actual = attrs(&[("spec.priority", "100")]);
        let desired = attrs(&[("spec.priority", "200")]);
        let changes = diff_attributes("okta_import_rule.test", &actual, &desired);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, "spec.priority");
        assert_eq!(changes[0].old.as_deref(), Some("100"));
        assert_eq!(changes[0].new.as_deref(), Some("200"));
    }

    #[test]
    fn test_diff_added_and_removed_keys() {
        let actual = attrs(&[("a", "1"), ("b", "2")]);
        let desired = attrs(&[("a", "1"), ("c", "3")]);
        let changes = diff_attributes("okta_import_rule.test", &actual, &desired);

        assert_eq!(changes.len(), 2);
        let added = changes.iter().find(|c| c.key == "c").unwrap();
        assert_eq!(added.old, None);
        assert_eq!(added.new.as_deref(), Some("3"));
        let removed = changes.iter().find(|c| c.key == "b").unwrap();
        assert_eq!(removed.old.as_deref(), Some("2"));
        assert_eq!(removed.new, None);
    }

    #[test]
    fn test_instance_state_from_rule_carries_id() {
        let rule = crate::resource::ImportRule::new("test", Default::default());
        let state = InstanceState::from_rule(&rule);
        assert_eq!(state.id, "test");
        assert_eq!(state.attributes["id"], "test");
        assert_eq!(state.attributes["kind"], "okta_import_rule");
    }
}
