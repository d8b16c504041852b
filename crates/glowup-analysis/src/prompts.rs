//! Prompt builders for the four analysis tasks.
//!
//! Each builder pairs the task's prompt text with the response shape it
//! demands, ready to hand to the generation client. Builders are pure string
//! work; empty batches are represented inside the prompt by a placeholder
//! sentence rather than an empty corpus.

use std::fmt;

use crate::schema::ResponseSchema;

/// Which batch a per-period task inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Then,
    Now,
}

impl Period {
    /// Lowercase label used in prose and error tags.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Then => "then",
            Self::Now => "now",
        }
    }

    /// Uppercase form used in the corpus banners.
    #[must_use]
    pub fn banner(self) -> &'static str {
        match self {
            Self::Then => "THEN",
            Self::Now => "NOW",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A prompt ready to send: the text plus the shape the reply must follow.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub text: String,
    pub schema: Option<ResponseSchema>,
}

fn corpus_or(posts: &[String], placeholder: String) -> String {
    if posts.is_empty() {
        placeholder
    } else {
        posts.join("\n")
    }
}

/// Free-text comparison of the two batches: two punchy lines on how the vibe
/// shifted between then and now.
#[must_use]
pub fn overall_comparison(then: &[String], now: &[String]) -> PromptRequest {
    let then_corpus = corpus_or(then, "No 'then' tweets provided.".to_string());
    let now_corpus = corpus_or(now, "No 'now' tweets provided.".to_string());
    let text = format!(
        r#"
Analyze the following two sets of tweets:

--- THEN TWEETS ---
{then_corpus}

--- NOW TWEETS ---
{now_corpus}

Provide a super concise summary (exactly 2 lines, GenZ style) comparing the vibe, main themes, or focus of the "THEN TWEETS" versus the "NOW TWEETS". Keep it short and punchy.
"#
    );
    PromptRequest { text, schema: None }
}

/// Structured per-period task: the single most prevalent topic plus a short
/// summary paragraph, returned as `{"topic_name", "summary_paragraph"}`.
#[must_use]
pub fn topic_identification(posts: &[String], period: Period) -> PromptRequest {
    let corpus = corpus_or(posts, format!("No {period} tweets provided."));
    let banner = period.banner();
    let text = format!(
        r#"
Analyze the following set of tweets from the "{period}" period:

--- {banner} TWEETS ---
{corpus}

Based on these tweets, identify the single most prevalent topic or theme.
Then, provide a small paragraph (3-5 sentences) summarizing this topic and how it's discussed in these tweets.

Return the response as a JSON object with two keys: "topic_name" (string) and "summary_paragraph" (string).
Example: {{"topic_name": "Coding Challenges", "summary_paragraph": "Tweets from this period often discuss coding problems, debugging, and sharing solutions, reflecting a strong focus on practical development hurdles."}}
"#
    );
    let schema = ResponseSchema::object(
        vec![
            ("topic_name", ResponseSchema::string()),
            ("summary_paragraph", ResponseSchema::string()),
        ],
        &["topic_name", "summary_paragraph"],
    );
    PromptRequest {
        text,
        schema: Some(schema),
    }
}

/// Structured per-period task: 3-5 GenZ-style personality keywords, returned
/// as `{"personality_keywords": [..]}`.
#[must_use]
pub fn personality_keywords(posts: &[String], period: Period) -> PromptRequest {
    let corpus = corpus_or(
        posts,
        format!("No {period} tweets provided for personality analysis."),
    );
    let banner = period.banner();
    let text = format!(
        r#"
Analyze the following tweets from the "{period}" period:

--- {banner} TWEETS ---
{corpus}

Describe the personality evident in these tweets using 3-5 GenZ-style keywords or short phrases.
Return the response as a JSON object with a single key: "personality_keywords" (array of strings).
Example: {{"personality_keywords": ["chill", "vibing", "low-key techie", "savage", "main character energy"]}}
"#
    );
    let schema = ResponseSchema::object(
        vec![(
            "personality_keywords",
            ResponseSchema::array(ResponseSchema::string()),
        )],
        &["personality_keywords"],
    );
    PromptRequest {
        text,
        schema: Some(schema),
    }
}

/// Free-text growth advice grounded in the then/now comparison, encouraging
/// in tone, one to two paragraphs.
#[must_use]
pub fn growth_advice(then: &[String], now: &[String]) -> PromptRequest {
    let then_corpus = corpus_or(then, "No 'then' tweets provided.".to_string());
    let now_corpus = corpus_or(now, "No 'now' tweets provided.".to_string());
    let text = format!(
        r#"
Based on the following comparison of "then" and "now" tweets, offer some friendly, constructive advice (1-2 paragraphs) on areas the user might consider improving or focusing on for growth. Keep the tone encouraging and supportive.

--- THEN TWEETS ---
{then_corpus}

--- NOW TWEETS ---
{now_corpus}

Advice:
"#
    );
    PromptRequest { text, schema: None }
}

#[cfg(test)]
mod tests {
    use super::{
        growth_advice, overall_comparison, personality_keywords, topic_identification, Period,
    };

    fn batch(posts: &[&str]) -> Vec<String> {
        posts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn overall_comparison_embeds_both_corpora() {
        let prompt = overall_comparison(
            &batch(&["then one", "then two"]),
            &batch(&["now one"]),
        );
        assert!(prompt.text.contains("--- THEN TWEETS ---\nthen one\nthen two\n"));
        assert!(prompt.text.contains("--- NOW TWEETS ---\nnow one\n"));
        assert!(prompt.schema.is_none());
    }

    #[test]
    fn overall_uses_quoted_placeholders_when_empty() {
        let prompt = overall_comparison(&[], &[]);
        assert!(prompt.text.contains("No 'then' tweets provided."));
        assert!(prompt.text.contains("No 'now' tweets provided."));
    }

    #[test]
    fn topic_prompt_carries_banner_and_schema() {
        let prompt = topic_identification(&batch(&["shipping code"]), Period::Now);
        assert!(prompt.text.contains("from the \"now\" period"));
        assert!(prompt.text.contains("--- NOW TWEETS ---\nshipping code\n"));

        let schema =
            serde_json::to_value(prompt.schema.expect("topic task is structured")).unwrap();
        assert_eq!(schema["type"], "OBJECT");
        assert_eq!(
            schema["required"],
            serde_json::json!(["topic_name", "summary_paragraph"])
        );
    }

    #[test]
    fn topic_placeholder_is_unquoted() {
        let prompt = topic_identification(&[], Period::Then);
        assert!(prompt.text.contains("No then tweets provided."));
        assert!(!prompt.text.contains("No 'then' tweets provided."));
    }

    #[test]
    fn personality_placeholder_names_the_analysis() {
        let prompt = personality_keywords(&[], Period::Now);
        assert!(prompt
            .text
            .contains("No now tweets provided for personality analysis."));
    }

    #[test]
    fn personality_schema_is_array_of_strings() {
        let prompt = personality_keywords(&batch(&["hello"]), Period::Then);
        let schema = serde_json::to_value(prompt.schema.expect("personality task is structured"))
            .unwrap();
        assert_eq!(
            schema["properties"]["personality_keywords"]["type"],
            "ARRAY"
        );
        assert_eq!(
            schema["properties"]["personality_keywords"]["items"]["type"],
            "STRING"
        );
    }

    #[test]
    fn growth_advice_ends_with_the_advice_cue() {
        let prompt = growth_advice(&batch(&["a"]), &batch(&["b"]));
        assert!(prompt.text.ends_with("Advice:\n"));
        assert!(prompt.schema.is_none());
    }

    #[test]
    fn period_labels_and_banners() {
        assert_eq!(Period::Then.label(), "then");
        assert_eq!(Period::Now.banner(), "NOW");
        assert_eq!(format!("{}", Period::Now), "now");
    }
}
