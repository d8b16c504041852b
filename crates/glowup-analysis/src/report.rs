//! Report assembly over the six generation tasks.
//!
//! Cleans both input batches, fans the four task kinds out over the
//! generation client (topic and personality once per period, six calls in
//! all), and folds each outcome into its report slot. A failed or mis-shaped
//! task degrades to error-tagged content in that slot; the run itself never
//! aborts and the report always carries all eight fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GenerationError;
use crate::generation::{Generated, GeminiClient};
use crate::normalize::clean_batch;
use crate::prompts::{self, Period};

/// The structured input the invoking process hands over.
///
/// `then` and `now` default to empty batches when absent; items are kept as
/// raw JSON values so non-string entries can be skipped during cleaning
/// instead of failing the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub then: Vec<Value>,
    #[serde(default)]
    pub now: Vec<Value>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

/// A per-period topic finding: the dominant topic and a short summary.
///
/// On a degraded task the name becomes an `Error/No Topic (..)` tag and the
/// summary carries the diagnostic or the stray payload, stringified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicResult {
    pub topic_name: String,
    pub summary_paragraph: String,
}

/// The flat report handed back to the invoking process.
///
/// Serializes with exactly these keys, in this order; the renamed spellings
/// are the contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    #[serde(rename = "Topic then")]
    pub topic_then: String,
    #[serde(rename = "Summary then")]
    pub summary_then: String,
    #[serde(rename = "Topic now")]
    pub topic_now: String,
    #[serde(rename = "Summary now")]
    pub summary_now: String,
    #[serde(rename = "Personality then")]
    pub personality_then: Vec<String>,
    #[serde(rename = "Personality now")]
    pub personality_now: Vec<String>,
    #[serde(rename = "Advice")]
    pub advice: String,
}

/// Runs the full analysis and assembles the report.
///
/// The six generation calls are independent and run concurrently. Every
/// failure mode of an individual call is folded into error-tagged content
/// for its slot, so this function is infallible by construction: with no
/// API key, for instance, each slot carries the missing-key message and no
/// network activity happens at all.
pub async fn analyze(client: &GeminiClient, request: &AnalysisRequest) -> AnalysisReport {
    let then = clean_batch(&request.then);
    let now = clean_batch(&request.now);
    let api_key = request.gemini_api_key.as_deref();

    let overall = prompts::overall_comparison(&then, &now);
    let topic_then = prompts::topic_identification(&then, Period::Then);
    let topic_now = prompts::topic_identification(&now, Period::Now);
    let personality_then = prompts::personality_keywords(&then, Period::Then);
    let personality_now = prompts::personality_keywords(&now, Period::Now);
    let advice = prompts::growth_advice(&then, &now);

    let (overall, topic_then, topic_now, personality_then, personality_now, advice) = tokio::join!(
        client.generate(&overall.text, api_key, overall.schema.as_ref()),
        client.generate(&topic_then.text, api_key, topic_then.schema.as_ref()),
        client.generate(&topic_now.text, api_key, topic_now.schema.as_ref()),
        client.generate(&personality_then.text, api_key, personality_then.schema.as_ref()),
        client.generate(&personality_now.text, api_key, personality_now.schema.as_ref()),
        client.generate(&advice.text, api_key, advice.schema.as_ref()),
    );

    let topic_then = topic_result(topic_then, Period::Then);
    let topic_now = topic_result(topic_now, Period::Now);

    AnalysisReport {
        summary: text_result(overall),
        topic_then: topic_then.topic_name,
        summary_then: topic_then.summary_paragraph,
        topic_now: topic_now.topic_name,
        summary_now: topic_now.summary_paragraph,
        personality_then: personality_result(personality_then, Period::Then),
        personality_now: personality_result(personality_now, Period::Now),
        advice: text_result(advice),
    }
}

/// Folds a free-text task outcome into its report field.
fn text_result(outcome: Result<Generated, GenerationError>) -> String {
    match outcome {
        Ok(Generated::Text(text)) => text,
        Ok(Generated::Structured(value)) => value.to_string(),
        Err(e) => e.to_string(),
    }
}

/// Folds a topic task outcome into a [`TopicResult`].
///
/// Anything other than an object carrying both required string fields
/// degrades to the error tag, with the outcome itself rendered into the
/// summary so the diagnostic stays visible where it always was.
fn topic_result(outcome: Result<Generated, GenerationError>, period: Period) -> TopicResult {
    let fallback = |detail: String| {
        tracing::warn!(period = %period, detail = %detail, "topic task degraded");
        TopicResult {
            topic_name: format!("Error/No Topic ({period})"),
            summary_paragraph: detail,
        }
    };

    match outcome {
        Ok(Generated::Structured(value)) => {
            let topic_name = value.get("topic_name").and_then(Value::as_str);
            let summary_paragraph = value.get("summary_paragraph").and_then(Value::as_str);
            match (topic_name, summary_paragraph) {
                (Some(topic_name), Some(summary_paragraph)) => TopicResult {
                    topic_name: topic_name.to_string(),
                    summary_paragraph: summary_paragraph.to_string(),
                },
                _ => fallback(value.to_string()),
            }
        }
        Ok(Generated::Text(text)) => fallback(text),
        Err(e) => fallback(e.to_string()),
    }
}

/// Folds a personality task outcome into the keyword list.
///
/// Only an object whose `personality_keywords` is an array of strings passes
/// through; everything else becomes the one-element error tag.
fn personality_result(outcome: Result<Generated, GenerationError>, period: Period) -> Vec<String> {
    let fallback = |detail: String| {
        tracing::warn!(period = %period, detail = %detail, "personality task degraded");
        vec![format!("Error/No Personality ({period})")]
    };

    match outcome {
        Ok(Generated::Structured(value)) => {
            match value.get("personality_keywords").and_then(Value::as_array) {
                Some(items) => {
                    let keywords: Option<Vec<String>> = items
                        .iter()
                        .map(|item| item.as_str().map(ToString::to_string))
                        .collect();
                    match keywords {
                        Some(keywords) => keywords,
                        None => fallback(value.to_string()),
                    }
                }
                None => fallback(value.to_string()),
            }
        }
        Ok(Generated::Text(text)) => fallback(text),
        Err(e) => fallback(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{personality_result, text_result, topic_result, AnalysisReport, AnalysisRequest};
    use crate::error::GenerationError;
    use crate::generation::Generated;
    use crate::prompts::Period;

    #[test]
    fn text_result_passes_text_through() {
        assert_eq!(text_result(Ok(Generated::Text("OK".to_string()))), "OK");
    }

    #[test]
    fn text_result_stringifies_structured_payloads() {
        let outcome = Ok(Generated::Structured(json!({"a": 1})));
        assert_eq!(text_result(outcome), r#"{"a":1}"#);
    }

    #[test]
    fn text_result_renders_error_messages() {
        assert_eq!(
            text_result(Err(GenerationError::MissingApiKey)),
            "AI Summary Error: Gemini API Key is not found."
        );
    }

    #[test]
    fn topic_result_accepts_wellformed_object() {
        let outcome = Ok(Generated::Structured(
            json!({"topic_name": "T", "summary_paragraph": "S"}),
        ));
        let topic = topic_result(outcome, Period::Then);
        assert_eq!(topic.topic_name, "T");
        assert_eq!(topic.summary_paragraph, "S");
    }

    #[test]
    fn topic_result_embeds_stray_payload_on_missing_fields() {
        let outcome = Ok(Generated::Structured(json!({"topic_name": "T"})));
        let topic = topic_result(outcome, Period::Now);
        assert_eq!(topic.topic_name, "Error/No Topic (now)");
        assert_eq!(topic.summary_paragraph, r#"{"topic_name":"T"}"#);
    }

    #[test]
    fn topic_result_rejects_non_string_fields() {
        let outcome = Ok(Generated::Structured(
            json!({"topic_name": 7, "summary_paragraph": "S"}),
        ));
        let topic = topic_result(outcome, Period::Then);
        assert_eq!(topic.topic_name, "Error/No Topic (then)");
    }

    #[test]
    fn topic_result_carries_error_message() {
        let topic = topic_result(Err(GenerationError::MalformedJson), Period::Then);
        assert_eq!(topic.topic_name, "Error/No Topic (then)");
        assert_eq!(
            topic.summary_paragraph,
            "AI Summary: Failed to parse structured JSON response."
        );
    }

    #[test]
    fn personality_result_accepts_string_array() {
        let outcome = Ok(Generated::Structured(
            json!({"personality_keywords": ["chill", "vibing"]}),
        ));
        assert_eq!(
            personality_result(outcome, Period::Then),
            vec!["chill", "vibing"]
        );
    }

    #[test]
    fn personality_result_keeps_empty_arrays() {
        let outcome = Ok(Generated::Structured(json!({"personality_keywords": []})));
        assert_eq!(
            personality_result(outcome, Period::Now),
            Vec::<String>::new()
        );
    }

    #[test]
    fn personality_result_rejects_non_string_items() {
        let outcome = Ok(Generated::Structured(
            json!({"personality_keywords": ["chill", 5]}),
        ));
        assert_eq!(
            personality_result(outcome, Period::Then),
            vec!["Error/No Personality (then)"]
        );
    }

    #[test]
    fn personality_result_rejects_missing_key() {
        let outcome = Ok(Generated::Structured(json!({"vibe": "off"})));
        assert_eq!(
            personality_result(outcome, Period::Now),
            vec!["Error/No Personality (now)"]
        );
    }

    #[test]
    fn personality_result_rejects_errors() {
        let outcome = Err(GenerationError::UnexpectedResponse);
        assert_eq!(
            personality_result(outcome, Period::Then),
            vec!["Error/No Personality (then)"]
        );
    }

    #[test]
    fn analysis_request_defaults_missing_fields() {
        let request: AnalysisRequest = serde_json::from_str("{}").unwrap();
        assert!(request.then.is_empty());
        assert!(request.now.is_empty());
        assert!(request.gemini_api_key.is_none());
    }

    #[test]
    fn analysis_request_keeps_non_string_items() {
        let request: AnalysisRequest =
            serde_json::from_str(r#"{"then": [null, 42, "x"], "now": []}"#).unwrap();
        assert_eq!(request.then.len(), 3);
    }

    #[test]
    fn report_serializes_with_legacy_keys_in_order() {
        let report = AnalysisReport {
            summary: "s".to_string(),
            topic_then: "tt".to_string(),
            summary_then: "st".to_string(),
            topic_now: "tn".to_string(),
            summary_now: "sn".to_string(),
            personality_then: vec!["a".to_string()],
            personality_now: vec![],
            advice: "go".to_string(),
        };
        let rendered = serde_json::to_string(&report).unwrap();
        assert_eq!(
            rendered,
            r#"{"summary":"s","Topic then":"tt","Summary then":"st","Topic now":"tn","Summary now":"sn","Personality then":["a"],"Personality now":[],"Advice":"go"}"#
        );
    }

    #[test]
    fn report_round_trips_through_serde() {
        let rendered = r#"{"summary":"s","Topic then":"tt","Summary then":"st","Topic now":"tn","Summary now":"sn","Personality then":[],"Personality now":["x"],"Advice":"a"}"#;
        let report: AnalysisReport = serde_json::from_str(rendered).unwrap();
        assert_eq!(report.personality_now, vec!["x"]);
        assert_eq!(report.advice, "a");
    }
}
