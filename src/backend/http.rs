use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::{Backend, BackendError};
use crate::resource::ImportRule;

/// HTTP client for a backend exposing the import rule REST surface:
/// `POST /v1/okta/import_rules`, `GET|PUT|DELETE /v1/okta/import_rules/{name}`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: String, token: Option<String>) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let auth_value = format!("Bearer {}", token);
            let header_value =
                HeaderValue::from_str(&auth_value).map_err(|_| BackendError::Auth {
                    message: "Invalid token format".to_string(),
                })?;
            headers.insert(AUTHORIZATION, header_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(BackendError::Network)?;

        Ok(Self { client, base_url })
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_base_url(base_url: String) -> Result<Self, BackendError> {
        Self::new(base_url, None)
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/v1/okta/import_rules", self.base_url)
    }

    fn rule_url(&self, name: &str) -> String {
        format!(
            "{}/v1/okta/import_rules/{}",
            self.base_url,
            urlencoding::encode(name)
        )
    }

    async fn read_rule(
        response: reqwest::Response,
        name: &str,
    ) -> Result<ImportRule, BackendError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                name: name.to_string(),
            });
        }
        if status == StatusCode::CONFLICT {
            return Err(BackendError::AlreadyExists {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ImportRule>()
            .await
            .map_err(|e| BackendError::Api {
                status: status.as_u16(),
                message: format!("Failed to parse response: {}", e),
            })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn create_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError> {
        let name = rule.name().to_string();
        let response = self
            .client
            .post(self.collection_url())
            .json(&rule)
            .send()
            .await?;

        let created = Self::read_rule(response, &name).await?;
        tracing::debug!(name = %name, "import rule created");
        Ok(created)
    }

    async fn get_import_rule(&self, name: &str) -> Result<ImportRule, BackendError> {
        let response = self.client.get(self.rule_url(name)).send().await?;
        Self::read_rule(response, name).await
    }

    async fn update_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError> {
        let name = rule.name().to_string();
        let response = self
            .client
            .put(self.rule_url(&name))
            .json(&rule)
            .send()
            .await?;

        let updated = Self::read_rule(response, &name).await?;
        tracing::debug!(name = %name, "import rule updated");
        Ok(updated)
    }

    async fn delete_import_rule(&self, name: &str) -> Result<(), BackendError> {
        let response = self.client.delete(self.rule_url(name)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(name = %name, "import rule deleted");
        Ok(())
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
