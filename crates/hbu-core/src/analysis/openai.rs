//! Chat-completions analyzer.
//!
//! Sends one request per plot and expects a JSON object in the first choice.
//! The response shape is feature-detected by [`AnalysisResult::from_json`].

use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::{AnalysisError, Analyzer};
use hbu_common::{AnalysisResult, Plot};
use hbu_config::AnalysisSettings;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Analyzer backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiAnalyzer {
    agent: ureq::Agent,
    endpoint: String,
    model: String,
    max_tokens: u32,
    api_key: String,
    schema: Option<Value>,
}

impl OpenAiAnalyzer {
    /// Build from settings, reading the API key from `settings.api_key_env`.
    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, AnalysisError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AnalysisError::MissingApiKey {
                env: settings.api_key_env.clone(),
            })?;
        Ok(Self::with_api_key(settings, api_key))
    }

    pub fn with_api_key(settings: &AnalysisSettings, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build();
        Self {
            agent,
            endpoint: format!("{}/chat/completions", settings.api_base.trim_end_matches('/')),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            api_key: api_key.into(),
            schema: Some(hbu_common::analysis::enhanced_schema()),
        }
    }

    /// Ask for the five narrative sections instead of the structured shape.
    pub fn narrative_only(mut self) -> Self {
        self.schema = None;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body for `plot`.
    pub fn request_body(&self, plot: &Plot) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt(plot, self.schema.as_ref()) },
            ],
            "response_format": { "type": "json_object" },
            "max_tokens": self.max_tokens,
        })
    }
}

/// Extract and parse the first choice's message content.
pub fn parse_completion(response: &Value) -> Result<AnalysisResult, AnalysisError> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
        .ok_or(AnalysisError::EmptyContent)?;
    Ok(AnalysisResult::from_json(content)?)
}

impl Analyzer for OpenAiAnalyzer {
    fn analyze(&self, plot: &Plot) -> Result<AnalysisResult, AnalysisError> {
        debug!(plot_id = %plot.id, model = %self.model, "requesting analysis");

        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_json(self.request_body(plot));

        let response = match response {
            Ok(r) => r,
            Err(ureq::Error::Status(status, r)) => {
                let body = r.into_string().unwrap_or_default();
                warn!(plot_id = %plot.id, status, "analysis request rejected");
                return Err(AnalysisError::Status { status, body });
            }
            Err(e) => return Err(AnalysisError::Http(e.to_string())),
        };

        let value: Value = response
            .into_json()
            .map_err(|e| AnalysisError::Http(format!("unreadable response body: {e}")))?;
        let result = parse_completion(&value)?;
        info!(
            plot_id = %plot.id,
            enhanced = result.is_enhanced(),
            "analysis received"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hbu_common::{PlotId, ShapeError};

    fn plot() -> Plot {
        Plot {
            id: PlotId::from("plot-002"),
            address: "Northern Ring Road, Al Yasmin".to_string(),
            parcel_number: "RY-2024-00167".to_string(),
            latitude: 24.8242,
            longitude: 46.6398,
            size: 16997.0,
            zoning: "MU-2 Mixed Use".to_string(),
            current_use: "Vacant Land".to_string(),
            market_value: None,
            owner_name: None,
            boundaries: None,
        }
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[test]
    fn test_request_body_shape() {
        let settings = AnalysisSettings {
            api_base: "http://localhost:9/v1/".to_string(),
            max_tokens: 2048,
            ..AnalysisSettings::default()
        };
        let analyzer = OpenAiAnalyzer::with_api_key(&settings, "sk-test");
        assert_eq!(analyzer.endpoint(), "http://localhost:9/v1/chat/completions");

        let body = analyzer.request_body(&plot());
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("- Parcel Number: RY-2024-00167"));
        assert!(user.contains("\"scenarios\""));
    }

    #[test]
    fn test_narrative_only_drops_schema() {
        let analyzer =
            OpenAiAnalyzer::with_api_key(&AnalysisSettings::default(), "sk-test").narrative_only();
        let body = analyzer.request_body(&plot());
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.contains("1. executiveSummary:"));
    }

    #[test]
    fn test_parse_simple_completion() {
        let content = json!({
            "executiveSummary": "Mixed-use is optimal.",
            "zoningAnalysis": "MU-2 permits retail and residential.",
            "marketDemand": "Residential absorption is strong.",
            "financialFeasibility": "IRR around 19%.",
            "developmentRecommendations": "Phase the residential towers."
        })
        .to_string();
        let result = parse_completion(&completion(&content)).unwrap();
        assert!(!result.is_enhanced());
    }

    #[test]
    fn test_parse_missing_content() {
        let err = parse_completion(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyContent));

        let err = parse_completion(&completion("  ")).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyContent));
    }

    #[test]
    fn test_parse_incomplete_completion() {
        let content = json!({ "executiveSummary": "Only a summary." }).to_string();
        let err = parse_completion(&completion(&content)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Shape(ShapeError::Incomplete { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_completion(&completion("not json")).unwrap_err();
        assert!(matches!(err, AnalysisError::Shape(ShapeError::Malformed(_))));
    }
}
