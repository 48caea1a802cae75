use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{Backend, BackendError};
use crate::resource::ImportRule;

#[derive(Debug, Default)]
struct Inner {
    rules: BTreeMap<String, ImportRule>,
    // name -> remaining get calls that still observe not-found
    pending_visibility: BTreeMap<String, u32>,
    visibility_lag: u32,
}

/// In-process backend for tests and local runs.
///
/// With a visibility lag of `n`, a freshly created rule answers not-found to
/// the next `n` reads, the same window a backend with read-after-write
/// eventual consistency exhibits.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility_lag(lag: u32) -> Self {
        Self {
            inner: Mutex::new(Inner {
                visibility_lag: lag,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn create_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError> {
        let mut inner = self.lock();
        let name = rule.name().to_string();
        if inner.rules.contains_key(&name) {
            return Err(BackendError::AlreadyExists { name });
        }
        if inner.visibility_lag > 0 {
            let lag = inner.visibility_lag;
            inner.pending_visibility.insert(name.clone(), lag);
        }
        inner.rules.insert(name, rule.clone());
        Ok(rule)
    }

    async fn get_import_rule(&self, name: &str) -> Result<ImportRule, BackendError> {
        let mut inner = self.lock();
        if let Some(remaining) = inner.pending_visibility.get_mut(name) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(BackendError::NotFound {
                    name: name.to_string(),
                });
            }
            inner.pending_visibility.remove(name);
        }
        inner
            .rules
            .get(name)
            .cloned()
            .ok_or_else(|| BackendError::NotFound {
                name: name.to_string(),
            })
    }

    async fn update_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError> {
        let mut inner = self.lock();
        let name = rule.name().to_string();
        if !inner.rules.contains_key(&name) {
            return Err(BackendError::NotFound { name });
        }
        inner.rules.insert(name, rule.clone());
        Ok(rule)
    }

    async fn delete_import_rule(&self, name: &str) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner.pending_visibility.remove(name);
        inner
            .rules
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound {
                name: name.to_string(),
            })
    }
}
