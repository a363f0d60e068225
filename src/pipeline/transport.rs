//! Transport: one HTTP request per user action against a fixed endpoint set.
//!
//! Every request goes through [`Transport::send`], which
//! 1. tells the observer the request started,
//! 2. turns the [`WireBody`] into a JSON or multipart `reqwest` body,
//! 3. maps the outcome onto [`RotError`]:
//!    - no response → `Transport` with the action's fallback text,
//!    - non-2xx → `Http` with the payload's `error` / `detail` / `message`
//!      field, or the fallback text,
//!    - 2xx with `status: "error"` → `Backend`, same message rules,
//!    - 2xx that does not decode → `Decode`,
//! 4. reports completion or failure to the observer.
//!
//! There are no retries. A failed request is terminal; the caller decides
//! whether to send it again.

use crate::config::ClientConfig;
use crate::error::RotError;
use crate::pipeline::payload::WireBody;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Fields the backend uses for error text, in lookup order.
const ERROR_FIELDS: [&str; 3] = ["error", "detail", "message"];

/// Backend endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Query,
    GeneratePodcast,
    UploadPdf,
    GenerateFlashcards,
    GenerateMnemonics,
    GenerateBrainRot,
    Health,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Query => "/query",
            Endpoint::GeneratePodcast => "/generate_podcast",
            Endpoint::UploadPdf => "/upload_pdf",
            Endpoint::GenerateFlashcards => "/generate-flashcards",
            Endpoint::GenerateMnemonics => "/generate-mnemonics",
            Endpoint::GenerateBrainRot => "/generate_brainrot",
            Endpoint::Health => "/health",
        }
    }
}

/// A user-triggered action. Decides the endpoint and the fallback error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Ask,
    SummarizeUrl,
    SummarizeFile,
    PodcastUrl,
    PodcastFile,
    UploadPdf,
    Flashcards,
    Mnemonics,
    BrainRot,
    Health,
}

impl Action {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Action::Ask | Action::SummarizeUrl | Action::SummarizeFile => Endpoint::Query,
            Action::PodcastUrl | Action::PodcastFile => Endpoint::GeneratePodcast,
            Action::UploadPdf => Endpoint::UploadPdf,
            Action::Flashcards => Endpoint::GenerateFlashcards,
            Action::Mnemonics => Endpoint::GenerateMnemonics,
            Action::BrainRot => Endpoint::GenerateBrainRot,
            Action::Health => Endpoint::Health,
        }
    }

    /// Text shown when the backend gave no usable message.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Action::Ask => "Failed to process query",
            Action::SummarizeUrl | Action::PodcastUrl => "Failed to process URL",
            Action::SummarizeFile | Action::PodcastFile => "Failed to process file",
            Action::UploadPdf => "Failed to upload PDF",
            Action::Flashcards => "Failed to generate flashcards",
            Action::Mnemonics => "Failed to generate mnemonics",
            Action::BrainRot => "Failed to process video",
            Action::Health => "Backend is not reachable",
        }
    }

    /// Text for a `status: "error"` envelope without an `error` field.
    fn status_error_message(self) -> &'static str {
        match self {
            Action::PodcastUrl | Action::PodcastFile => "Failed to generate podcast",
            Action::BrainRot => "Something went wrong",
            other => other.fallback_message(),
        }
    }

    /// Short name for logs and progress output.
    pub fn label(self) -> &'static str {
        match self {
            Action::Ask => "answer",
            Action::SummarizeUrl | Action::SummarizeFile => "summary",
            Action::PodcastUrl | Action::PodcastFile => "podcast",
            Action::UploadPdf => "upload",
            Action::Flashcards => "flashcards",
            Action::Mnemonics => "mnemonics",
            Action::BrainRot => "brain-rot video",
            Action::Health => "health check",
        }
    }
}

/// Pull a human-readable message out of an error payload.
pub fn extract_error_message(body: &Value) -> Option<String> {
    ERROR_FIELDS
        .iter()
        .filter_map(|k| body.get(*k))
        .find_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reject 2xx bodies that report `status: "error"`.
pub fn check_envelope(body: &Value, action: Action) -> Result<(), RotError> {
    if body.get("status").and_then(Value::as_str) == Some("error") {
        let message = extract_error_message(body)
            .unwrap_or_else(|| action.status_error_message().to_string());
        return Err(RotError::Backend { message });
    }
    Ok(())
}

/// HTTP client bound to one backend origin.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Transport {
    pub fn new(config: ClientConfig) -> Result<Self, RotError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| RotError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST `body` for `action` and decode the 2xx response as `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        action: Action,
        body: WireBody,
    ) -> Result<T, RotError> {
        let url = self.config.endpoint_url(action.endpoint().path());
        self.observe(action, async {
            match self.build_request(action, &url, body).await {
                Ok(request) => self.dispatch(action, request).await,
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn build_request(
        &self,
        action: Action,
        url: &str,
        body: WireBody,
    ) -> Result<reqwest::RequestBuilder, RotError> {
        match body {
            WireBody::Json(value) => {
                debug!("POST {url} (json)");
                Ok(self.http.post(url).json(&value))
            }
            WireBody::Multipart { file, fields } => {
                let bytes = tokio::fs::read(&file.path)
                    .await
                    .map_err(|e| RotError::Transport {
                        action,
                        reason: format!("reading {}: {e}", file.path.display()),
                    })?;
                debug!(
                    "POST {url} (multipart, {} = {} bytes)",
                    file.field,
                    bytes.len()
                );
                let part = Part::bytes(bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.mime)
                    .map_err(|e| RotError::Transport {
                        action,
                        reason: format!("bad MIME type '{}': {e}", file.mime),
                    })?;
                let form = fields
                    .into_iter()
                    .fold(Form::new().part(file.field, part), |form, (k, v)| {
                        form.text(k, v)
                    });
                Ok(self.http.post(url).multipart(form))
            }
        }
    }

    /// GET for `action` and decode the 2xx response as `T`.
    pub async fn get<T: DeserializeOwned>(&self, action: Action) -> Result<T, RotError> {
        let url = self.config.endpoint_url(action.endpoint().path());
        debug!("GET {url}");
        self.observe(action, self.dispatch(action, self.http.get(&url)))
            .await
    }

    async fn observe<T, F>(&self, action: Action, fut: F) -> Result<T, RotError>
    where
        F: std::future::Future<Output = Result<T, RotError>>,
    {
        let start = Instant::now();
        info!("Requesting {}", action.label());
        if let Some(ob) = &self.config.observer {
            ob.on_request_start(action);
        }

        let result = fut.await;

        match &result {
            Ok(_) => {
                let elapsed = start.elapsed();
                info!("{} ready in {}ms", action.label(), elapsed.as_millis());
                if let Some(ob) = &self.config.observer {
                    ob.on_request_complete(action, elapsed);
                }
            }
            Err(e) => {
                match e.detail() {
                    Some(detail) => warn!("{} failed: {e} ({detail})", action.label()),
                    None => warn!("{} failed: {e}", action.label()),
                }
                if let Some(ob) = &self.config.observer {
                    ob.on_request_error(action, &e.user_message());
                }
            }
        }
        result
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        action: Action,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RotError> {
        let response = request.send().await.map_err(|e| RotError::Transport {
            action,
            reason: e.to_string(),
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| RotError::Transport {
            action,
            reason: format!("reading body: {e}"),
        })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .as_ref()
                .and_then(extract_error_message)
                .unwrap_or_else(|| action.fallback_message().to_string());
            return Err(RotError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| RotError::Decode {
            action,
            detail: format!("response is not JSON: {e}"),
        })?;
        check_envelope(&value, action)?;

        serde_json::from_value(value).map_err(|e| RotError::Decode {
            action,
            detail: format!("unexpected response shape: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Action::SummarizeUrl.endpoint().path(), "/query");
        assert_eq!(Action::PodcastFile.endpoint().path(), "/generate_podcast");
        assert_eq!(Action::Flashcards.endpoint().path(), "/generate-flashcards");
        assert_eq!(Action::Mnemonics.endpoint().path(), "/generate-mnemonics");
        assert_eq!(Action::BrainRot.endpoint().path(), "/generate_brainrot");
        assert_eq!(Action::UploadPdf.endpoint().path(), "/upload_pdf");
    }

    #[test]
    fn error_field_lookup_order() {
        assert_eq!(
            extract_error_message(&json!({ "error": "bad pdf", "detail": "x" })),
            Some("bad pdf".into())
        );
        assert_eq!(
            extract_error_message(&json!({ "detail": "model overloaded" })),
            Some("model overloaded".into())
        );
        // FastAPI validation errors put a list in `detail`
        assert_eq!(
            extract_error_message(&json!({ "detail": [{ "loc": ["body"] }] })),
            None
        );
        assert_eq!(extract_error_message(&json!({ "error": "  " })), None);
        assert_eq!(extract_error_message(&json!("plain")), None);
    }

    #[test]
    fn status_error_envelope() {
        let err = check_envelope(
            &json!({ "status": "error", "error": "tts quota" }),
            Action::PodcastUrl,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "tts quota");

        let err = check_envelope(&json!({ "status": "error" }), Action::PodcastUrl).unwrap_err();
        assert_eq!(err.user_message(), "Failed to generate podcast");

        let err = check_envelope(&json!({ "status": "error" }), Action::BrainRot).unwrap_err();
        assert_eq!(err.user_message(), "Something went wrong");

        assert!(check_envelope(&json!({ "status": "success" }), Action::BrainRot).is_ok());
        assert!(check_envelope(&json!({ "answer": "ok" }), Action::SummarizeUrl).is_ok());
    }

    #[test]
    fn fallback_messages() {
        assert_eq!(Action::SummarizeFile.fallback_message(), "Failed to process file");
        assert_eq!(Action::UploadPdf.fallback_message(), "Failed to upload PDF");
    }
}
