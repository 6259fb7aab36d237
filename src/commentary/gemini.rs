//! Gemini `generateContent` wire format and browser client

use serde::{Deserialize, Serialize};

use super::CommentaryError;
use crate::settings::CommentaryConfig;

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: String, generation_config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config,
        }
    }

    /// Short, high-temperature one-liner
    pub fn live(prompt: String, config: &CommentaryConfig) -> Self {
        Self::from_prompt(
            prompt,
            Some(GenerationConfig {
                max_output_tokens: config.max_output_tokens,
                temperature: config.temperature,
            }),
        )
    }

    /// Model defaults
    pub fn analysis(prompt: String) -> Self {
        Self::from_prompt(prompt, None)
    }
}

/// `POST` target for the configured model
pub fn endpoint_url(config: &CommentaryConfig) -> String {
    format!(
        "{}/models/{}:generateContent",
        config.endpoint.trim_end_matches('/'),
        config.model
    )
}

/// Text of the first candidate, all parts joined and trimmed
pub fn parse_response(body: &str) -> Result<String, CommentaryError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| CommentaryError::Malformed(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Err(CommentaryError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
mod client {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    use super::{GenerateRequest, endpoint_url, parse_response};
    use crate::commentary::prompt::{analysis_prompt, live_prompt};
    use crate::commentary::{CommentaryError, Commentator};
    use crate::settings::CommentaryConfig;
    use crate::sim::{GameEvent, GameStats};
    use crate::theme::TrackTheme;

    /// Talks to the Gemini REST API with `fetch`
    #[derive(Debug, Clone)]
    pub struct GeminiCommentator {
        config: CommentaryConfig,
    }

    impl GeminiCommentator {
        pub fn new(config: CommentaryConfig) -> Self {
            Self { config }
        }

        async fn generate(&self, request: &GenerateRequest) -> Result<String, CommentaryError> {
            let api_key = self
                .config
                .credential()
                .ok_or(CommentaryError::MissingCredential)?;
            let body = serde_json::to_string(request)
                .map_err(|e| CommentaryError::Malformed(e.to_string()))?;

            let opts = RequestInit::new();
            opts.set_method("POST");
            opts.set_mode(RequestMode::Cors);
            opts.set_body(&JsValue::from_str(&body));

            let request = Request::new_with_str_and_init(&endpoint_url(&self.config), &opts)
                .map_err(js_error)?;
            let headers = request.headers();
            headers
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
            headers.set("x-goog-api-key", api_key).map_err(js_error)?;

            let window = web_sys::window()
                .ok_or_else(|| CommentaryError::Transport("no window".to_string()))?;
            let value = JsFuture::from(window.fetch_with_request(&request))
                .await
                .map_err(js_error)?;
            let response: Response = value.dyn_into().map_err(js_error)?;
            if !response.ok() {
                return Err(CommentaryError::Status(response.status()));
            }

            let text = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?;
            let text = text
                .as_string()
                .ok_or_else(|| CommentaryError::Malformed("non-text body".to_string()))?;
            parse_response(&text)
        }
    }

    impl Commentator for GeminiCommentator {
        async fn live_comment(
            &self,
            stats: &GameStats,
            theme: &TrackTheme,
            event: GameEvent,
        ) -> Result<String, CommentaryError> {
            let request = GenerateRequest::live(live_prompt(stats, theme, event), &self.config);
            self.generate(&request).await
        }

        async fn post_race_analysis(
            &self,
            stats: &GameStats,
            theme: &TrackTheme,
        ) -> Result<String, CommentaryError> {
            let request = GenerateRequest::analysis(analysis_prompt(stats, theme));
            self.generate(&request).await
        }
    }

    fn js_error(value: JsValue) -> CommentaryError {
        CommentaryError::Transport(format!("{:?}", value))
    }
}

#[cfg(target_arch = "wasm32")]
pub use client::GeminiCommentator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_request_shape() {
        let config = CommentaryConfig::default();
        let request = GenerateRequest::live("hello".into(), &config);
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 30);
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_analysis_request_omits_config() {
        let request = GenerateRequest::analysis("recap".into());
        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_endpoint_url() {
        let config = CommentaryConfig {
            endpoint: "https://example.test/v1beta/".into(),
            model: "m1".into(),
            ..CommentaryConfig::default()
        };
        assert_eq!(
            endpoint_url(&config),
            "https://example.test/v1beta/models/m1:generateContent"
        );
    }

    #[test]
    fn test_parse_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":" Blazing "},{"text":"fast! "}]}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Blazing fast!");
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        assert!(matches!(
            parse_response(r#"{"candidates":[]}"#),
            Err(CommentaryError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(CommentaryError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response("<html>"),
            Err(CommentaryError::Malformed(_))
        ));
    }
}
