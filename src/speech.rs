//! Client side of the external speech transcription collaborator.
//!
//! The collaborator is an opaque network service that owns microphone capture
//! and recognition; this module only asks it for one utterance and maps its
//! two failure modes. Implementors of [`SpeechRecognizer`] must be
//! `Send + Sync` so they can be shared behind an `Arc` across requests.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SpeechConfig;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The utterance could not be understood (silence, noise, empty result).
    #[error("no speech detected")]
    NoSpeech,
    /// The collaborator is unreachable or answered with a failure.
    #[error("speech service unavailable: {0}")]
    Service(String),
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Block until the collaborator has captured and transcribed one
    /// utterance in the given locale.
    async fn listen_and_transcribe(&self, locale: &str) -> Result<String, SpeechError>;
}

/// Talks to the transcription service over HTTP: `POST <base_url>/listen`
/// with `{"locale": ...}`, expecting `{"transcript": ...}` back. The service
/// holds the request open for the whole capture, so the client timeout from
/// [`SpeechConfig::timeout_secs`] bounds the wait.
pub struct HttpRecognizer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecognizer {
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for HttpRecognizer {
    async fn listen_and_transcribe(&self, locale: &str) -> Result<String, SpeechError> {
        let url = format!("{}/listen", self.base_url);
        let body = serde_json::json!({ "locale": locale });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SpeechError::Service(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SpeechError::Service(format!(
                "status {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SpeechError::Service(e.to_string()))?;

        let transcript = json["transcript"].as_str().unwrap_or("").trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        Ok(transcript)
    }
}
