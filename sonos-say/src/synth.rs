//! Remote text-to-speech over the Google Translate TTS endpoint.
//!
//! One blocking GET per piece of text; the response body is the MP3 data.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::TtsConfig;

/// Position of a piece within multi-part text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Part {
    pub total: usize,
    pub idx: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest<'a> {
    pub language: &'a str,
    pub text: &'a str,
    pub part: Option<Part>,
}

/// Failure of the remote service. Not recoverable: the caller must stop.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("HTTP error {status} from {url}")]
    Http { status: StatusCode, url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Anything that turns text into audio bytes.
pub trait Synthesizer {
    fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<Vec<u8>, SynthesisError>;
}

pub struct GoogleTranslateTts {
    endpoint: String,
    user_agent: String,
    client: Client,
}

impl GoogleTranslateTts {
    pub fn new(config: &TtsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            client,
        })
    }
}

/// Build the request URL: language and percent-encoded text, plus the part
/// counters for multi-part text.
///
/// Everything outside `A-Za-z0-9-_.~` is encoded, `/` included.
pub fn request_url(endpoint: &str, request: &SynthesisRequest<'_>) -> String {
    let mut url = format!(
        "{endpoint}?tl={}&q={}",
        request.language,
        urlencoding::encode(request.text)
    );
    if let Some(part) = request.part {
        url.push_str(&format!("&total={}&idx={}", part.total, part.idx));
    }
    url
}

impl Synthesizer for GoogleTranslateTts {
    fn synthesize(&self, request: &SynthesisRequest<'_>) -> Result<Vec<u8>, SynthesisError> {
        let url = request_url(&self.endpoint, request);
        debug!("TTS request: {url}");

        let request_failed = |source| SynthesisError::Request {
            url: url.clone(),
            source,
        };

        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(request_failed)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SynthesisError::Http {
                status,
                url: url.clone(),
            });
        }

        let bytes = resp.bytes().map_err(request_failed)?;
        debug!("Received {} bytes of audio", bytes.len());
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    const ENDPOINT: &str = "http://translate.google.com/translate_tts";

    #[test]
    fn test_single_request_url() {
        let req = SynthesisRequest {
            language: "en",
            text: "Good morning, it's 09:05",
            part: None,
        };
        assert_eq!(
            request_url(ENDPOINT, &req),
            "http://translate.google.com/translate_tts?tl=en&q=Good%20morning%2C%20it%27s%2009%3A05"
        );
    }

    #[test]
    fn test_slash_in_text_is_encoded() {
        let req = SynthesisRequest {
            language: "en",
            text: "either/or",
            part: None,
        };
        assert_eq!(
            request_url(ENDPOINT, &req),
            "http://translate.google.com/translate_tts?tl=en&q=either%2For"
        );
    }

    #[test]
    fn test_part_request_url() {
        let req = SynthesisRequest {
            language: "de",
            text: "Guten Tag",
            part: Some(Part { total: 3, idx: 1 }),
        };
        assert_eq!(
            request_url(ENDPOINT, &req),
            "http://translate.google.com/translate_tts?tl=de&q=Guten%20Tag&total=3&idx=1"
        );
    }

    #[test]
    fn test_unreachable_endpoint_is_request_error() {
        let config = TtsConfig {
            // Nothing listens on the local discard port.
            endpoint: "http://127.0.0.1:9/translate_tts".into(),
            timeout_secs: 2,
            ..TtsConfig::default()
        };
        let tts = GoogleTranslateTts::new(&config).unwrap();
        let req = SynthesisRequest {
            language: "en",
            text: "hi",
            part: None,
        };
        let err = tts.synthesize(&req).unwrap_err();
        assert!(matches!(err, SynthesisError::Request { .. }), "{err}");
    }

    #[test]
    fn test_returns_body_and_sends_user_agent() {
        let (base, requests) = serve(vec![(StatusCode::OK, b"ID3audio".to_vec())]);
        let config = TtsConfig {
            endpoint: format!("{base}/translate_tts"),
            ..TtsConfig::default()
        };
        let tts = GoogleTranslateTts::new(&config).unwrap();
        let req = SynthesisRequest {
            language: "en",
            text: "hello there",
            part: None,
        };

        assert_eq!(tts.synthesize(&req).unwrap(), b"ID3audio");

        let seen = requests.recv().unwrap();
        assert_eq!(seen.method, "GET");
        assert_eq!(seen.uri.path(), "/translate_tts");
        assert_eq!(seen.uri.query(), Some("tl=en&q=hello%20there"));
        assert_eq!(seen.header("user-agent"), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_http_error_status_is_fatal_error() {
        let (base, _requests) = serve(vec![(StatusCode::SERVICE_UNAVAILABLE, Vec::new())]);
        let config = TtsConfig {
            endpoint: base,
            ..TtsConfig::default()
        };
        let tts = GoogleTranslateTts::new(&config).unwrap();
        let req = SynthesisRequest {
            language: "en",
            text: "hi",
            part: None,
        };

        match tts.synthesize(&req) {
            Err(SynthesisError::Http { status, .. }) => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }
}
