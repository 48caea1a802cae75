//! Declarative configuration fixtures, keyed by scenario name.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture '{name}' not found")]
    NotFound { name: String },

    #[error("failed to read fixture '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Supplies configuration text by name. The text is opaque to the verifier;
/// only the provider under test parses it.
pub trait FixtureSource: Send + Sync {
    fn get_fixture(&self, name: &str) -> Result<String, FixtureError>;
}

/// Reads fixtures from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirFixtures {
    root: PathBuf,
}

impl DirFixtures {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FixtureSource for DirFixtures {
    fn get_fixture(&self, name: &str) -> Result<String, FixtureError> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => FixtureError::NotFound {
                name: name.to_string(),
            },
            _ => FixtureError::Io {
                name: name.to_string(),
                source,
            },
        })
    }
}

/// In-memory fixture map for tests.
#[derive(Debug, Clone, Default)]
pub struct MapFixtures {
    fixtures: HashMap<String, String>,
}

impl MapFixtures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, config: impl Into<String>) -> Self {
        self.fixtures.insert(name.into(), config.into());
        self
    }
}

impl FixtureSource for MapFixtures {
    fn get_fixture(&self, name: &str) -> Result<String, FixtureError> {
        self.fixtures
            .get(name)
            .cloned()
            .ok_or_else(|| FixtureError::NotFound {
                name: name.to_string(),
            })
    }
}
