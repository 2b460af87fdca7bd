//! HTTP skin analysis providers.
//!
//! Two wire styles are supported: a JSON body carrying the base64 image with
//! a bearer token, and a multipart form in the Face++ style with key/secret
//! fields. Both expect the flat score record understood by
//! [`RawAnalysis`].

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use dermastudio_core::analysis::{AnalysisProvider, MockAnalysisProvider, RawAnalysis};
use dermastudio_core::config::{AnalysisConfig, AnalysisMode};
use dermastudio_core::errors::ApplicationError;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{info, warn};

const IMAGE_FILE_NAME: &str = "image.jpg";
const IMAGE_MIME: &str = "image/jpeg";

enum Credentials {
    Bearer { token: SecretString },
    FormData { api_key: SecretString, api_secret: SecretString },
}

pub struct HttpAnalysisProvider {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

/// Picks the provider named by `analysis.mode`.
pub fn provider_from_config(
    config: &AnalysisConfig,
) -> Result<Box<dyn AnalysisProvider>, ApplicationError> {
    match config.mode {
        AnalysisMode::Mock => Ok(Box::new(MockAnalysisProvider)),
        AnalysisMode::BearerJson | AnalysisMode::FormdataFacepp => {
            Ok(Box::new(HttpAnalysisProvider::from_config(config)?))
        }
    }
}

impl HttpAnalysisProvider {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ApplicationError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| {
                ApplicationError::Configuration("analysis.endpoint is not configured".to_owned())
            })?
            .to_owned();

        let credentials = match config.mode {
            AnalysisMode::BearerJson => Credentials::Bearer {
                token: required_secret(&config.bearer_token, "analysis.bearer_token")?,
            },
            AnalysisMode::FormdataFacepp => Credentials::FormData {
                api_key: required_secret(&config.api_key, "analysis.api_key")?,
                api_secret: required_secret(&config.api_secret, "analysis.api_secret")?,
            },
            AnalysisMode::Mock => {
                return Err(ApplicationError::Configuration(
                    "mock analysis mode has no http provider".to_owned(),
                ));
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                ApplicationError::Configuration(format!("failed to build http client: {error}"))
            })?;

        Ok(Self { client, endpoint, credentials })
    }

    fn request(&self, image: &[u8]) -> Result<RequestBuilder, ApplicationError> {
        match &self.credentials {
            Credentials::Bearer { token } => Ok(self
                .client
                .post(&self.endpoint)
                .bearer_auth(token.expose_secret())
                .json(&json!({ "image_base64": BASE64_STANDARD.encode(image) }))),
            Credentials::FormData { api_key, api_secret } => {
                let image_part = Part::bytes(image.to_vec())
                    .file_name(IMAGE_FILE_NAME)
                    .mime_str(IMAGE_MIME)
                    .map_err(|error| {
                        ApplicationError::Integration(format!("invalid image part: {error}"))
                    })?;
                let form = Form::new()
                    .text("api_key", api_key.expose_secret().to_owned())
                    .text("api_secret", api_secret.expose_secret().to_owned())
                    .part("image_file", image_part);
                Ok(self.client.post(&self.endpoint).multipart(form))
            }
        }
    }
}

#[async_trait]
impl AnalysisProvider for HttpAnalysisProvider {
    fn mode(&self) -> &'static str {
        match self.credentials {
            Credentials::Bearer { .. } => AnalysisMode::BearerJson.as_str(),
            Credentials::FormData { .. } => AnalysisMode::FormdataFacepp.as_str(),
        }
    }

    async fn analyze(&self, image: &[u8]) -> Result<RawAnalysis, ApplicationError> {
        info!(
            event_name = "analysis.request.start",
            mode = self.mode(),
            endpoint = %self.endpoint,
            image_bytes = image.len(),
            "sending image to skin analysis provider"
        );

        let response = self.request(image)?.send().await.map_err(|error| {
            warn!(
                event_name = "analysis.request.failed",
                error = %error,
                "analysis request failed"
            );
            ApplicationError::Integration(format!("analysis request failed: {error}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "analysis.request.rejected",
                status = status.as_u16(),
                "analysis provider returned an error status"
            );
            return Err(ApplicationError::Integration(format!(
                "analysis endpoint returned {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|error| {
            ApplicationError::Integration(format!("failed to decode analysis response: {error}"))
        })?;
        let raw = RawAnalysis::from_json(body)?;
        if let Some(error) = raw.error.as_deref() {
            return Err(ApplicationError::Integration(format!("analysis provider error: {error}")));
        }

        info!(
            event_name = "analysis.request.completed",
            mode = self.mode(),
            "skin analysis response received"
        );
        Ok(raw)
    }
}

fn required_secret(
    value: &Option<SecretString>,
    field: &str,
) -> Result<SecretString, ApplicationError> {
    value
        .as_ref()
        .filter(|secret| !secret.expose_secret().trim().is_empty())
        .cloned()
        .ok_or_else(|| ApplicationError::Configuration(format!("{field} is not configured")))
}

#[cfg(test)]
mod tests {
    use dermastudio_core::analysis::AnalysisProvider;
    use dermastudio_core::config::{AnalysisConfig, AnalysisMode};
    use dermastudio_core::errors::ApplicationError;

    use super::{provider_from_config, HttpAnalysisProvider};

    fn config(mode: AnalysisMode, endpoint: Option<&str>) -> AnalysisConfig {
        AnalysisConfig {
            mode,
            endpoint: endpoint.map(str::to_owned),
            bearer_token: Some("token".to_owned().into()),
            api_key: Some("key".to_owned().into()),
            api_secret: Some("secret".to_owned().into()),
            timeout_secs: 2,
        }
    }

    #[test]
    fn mode_selects_provider() {
        let mock = provider_from_config(&config(AnalysisMode::Mock, None)).expect("mock provider");
        assert_eq!(mock.mode(), "mock");

        let bearer = provider_from_config(&config(
            AnalysisMode::BearerJson,
            Some("https://skin.example.test/analyze"),
        ))
        .expect("bearer provider");
        assert_eq!(bearer.mode(), "bearer_json");

        let facepp = provider_from_config(&config(
            AnalysisMode::FormdataFacepp,
            Some("https://skin.example.test/facepp"),
        ))
        .expect("facepp provider");
        assert_eq!(facepp.mode(), "formdata_facepp");
    }

    #[test]
    fn http_modes_need_endpoint_and_credentials() {
        let missing_endpoint =
            HttpAnalysisProvider::from_config(&config(AnalysisMode::BearerJson, None));
        assert!(matches!(missing_endpoint, Err(ApplicationError::Configuration(_))));

        let mut no_secret = config(AnalysisMode::FormdataFacepp, Some("https://skin.example.test"));
        no_secret.api_secret = Some("   ".to_owned().into());
        let error = HttpAnalysisProvider::from_config(&no_secret).err().expect("missing secret");
        assert!(error.to_string().contains("analysis.api_secret"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_integration_error() {
        let provider = HttpAnalysisProvider::from_config(&config(
            AnalysisMode::BearerJson,
            Some("http://127.0.0.1:9/analyze"),
        ))
        .expect("provider");

        let result = provider.analyze(b"jpeg-bytes").await;
        assert!(matches!(result, Err(ApplicationError::Integration(_))));
    }
}
