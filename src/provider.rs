//! The provider under test: a declarative reconciler that drives the backend
//! from configuration documents and mirrors remote state locally.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::backend::{Backend, BackendError};
use crate::resource::{ImportRule, ImportRuleSpec, ValidationError};
use crate::state::{InstanceState, StateDiff, diff_attributes};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unsupported resource type: '{0}'")]
    UnsupportedType(String),

    #[error("no resources declared in configuration")]
    EmptyConfig,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Terraform JSON syntax document:
/// `{"resource": {"okta_import_rule": {"<name>": { "spec": … }}}}`.
#[derive(Debug, Deserialize)]
struct ConfigDoc {
    #[serde(default)]
    resource: BTreeMap<String, BTreeMap<String, ResourceBody>>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceBody {
    #[serde(default)]
    spec: ImportRuleSpec,
}

#[derive(Debug)]
struct Declaration {
    address: String,
    name: String,
    spec: ImportRuleSpec,
}

fn parse_config(config: &str) -> Result<Vec<Declaration>, ProviderError> {
    let doc: ConfigDoc = serde_json::from_str(config)?;

    let mut declarations = Vec::new();
    for (resource_type, instances) in doc.resource {
        if resource_type != ImportRule::KIND {
            return Err(ProviderError::UnsupportedType(resource_type));
        }
        for (name, body) in instances {
            declarations.push(Declaration {
                address: format!("{}.{}", ImportRule::KIND, name),
                name,
                spec: body.spec,
            });
        }
    }

    if declarations.is_empty() {
        return Err(ProviderError::EmptyConfig);
    }

    Ok(declarations)
}

/// Reconciles declared resources against the backend. Holds the local state
/// mirror for one test case; nothing here is shared across cases.
pub struct Provider {
    backend: Arc<dyn Backend>,
    state: BTreeMap<String, InstanceState>,
}

impl Provider {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &BTreeMap<String, InstanceState> {
        &self.state
    }

    /// Applies a configuration: validates each declared resource, creates or
    /// updates it through the backend, then reads it back so local state
    /// mirrors what the backend actually stored.
    pub async fn apply(&mut self, config: &str) -> Result<(), ProviderError> {
        for decl in parse_config(config)? {
            let mut rule = ImportRule::new(decl.name.clone(), decl.spec);
            rule.check_and_set_defaults()?;

            match self.backend.get_import_rule(&decl.name).await {
                Ok(_) => {
                    self.backend.update_import_rule(rule).await?;
                    tracing::info!(address = %decl.address, "resource updated");
                }
                Err(e) if e.is_not_found() => {
                    self.backend.create_import_rule(rule).await?;
                    tracing::info!(address = %decl.address, "resource created");
                }
                Err(e) => return Err(e.into()),
            }

            let stored = self.backend.get_import_rule(&decl.name).await?;
            self.state
                .insert(decl.address, InstanceState::from_rule(&stored));
        }

        Ok(())
    }

    /// Computes the diff between the configuration and refreshed remote
    /// state without applying anything. An empty diff means convergence.
    pub async fn plan(&mut self, config: &str) -> Result<StateDiff, ProviderError> {
        let mut diff = StateDiff::default();

        for decl in parse_config(config)? {
            let mut rule = ImportRule::new(decl.name.clone(), decl.spec);
            rule.check_and_set_defaults()?;
            let desired = InstanceState::from_rule(&rule).attributes;

            let actual = match self.backend.get_import_rule(&decl.name).await {
                Ok(stored) => {
                    let refreshed = InstanceState::from_rule(&stored);
                    let attributes = refreshed.attributes.clone();
                    self.state.insert(decl.address.clone(), refreshed);
                    attributes
                }
                Err(e) if e.is_not_found() => {
                    self.state.remove(&decl.address);
                    BTreeMap::new()
                }
                Err(e) => return Err(e.into()),
            };

            diff.extend(diff_attributes(&decl.address, &actual, &desired));
        }

        tracing::debug!(changes = diff.changes.len(), "plan computed");
        Ok(diff)
    }

    /// Binds an existing remote resource into local state without recreating
    /// it. The configuration supplies the address (an empty resource block);
    /// `id` names the remote object.
    pub async fn import(&mut self, config: &str, id: &str) -> Result<InstanceState, ProviderError> {
        let decl = parse_config(config)?
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyConfig)?;

        let rule = self.backend.get_import_rule(id).await?;
        let state = InstanceState::from_rule(&rule);
        tracing::info!(address = %decl.address, id = %id, "resource imported");
        self.state.insert(decl.address, state.clone());
        Ok(state)
    }

    /// Deletes every locally tracked resource. Not-found during delete means
    /// the remote object is already gone and is tolerated.
    pub async fn destroy(&mut self) -> Result<(), ProviderError> {
        let addresses: Vec<String> = self.state.keys().cloned().collect();

        for address in addresses {
            let name = match self.state.get(&address) {
                Some(instance) => instance.id.clone(),
                None => continue,
            };
            match self.backend.delete_import_rule(&name).await {
                Ok(()) | Err(BackendError::NotFound { .. }) => {
                    tracing::info!(address = %address, "resource destroyed");
                    self.state.remove(&address);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}
