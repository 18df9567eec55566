use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Headings under which the improver places the rewritten speech, in the
/// order they are looked up.
pub const VERSION_HEADINGS: &[&str] = &[
    "IMPROVED VERSION",
    "CORRECTED VERSION",
    "ENHANCED VERSION",
    "ACADEMIC VERSION",
    "CONVERSATIONAL VERSION",
    "PERSUASIVE VERSION",
    "CONCISE VERSION",
    "FORMAL VERSION",
];

pub const GENERAL_SECTION: &str = "GENERAL";

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"^([A-Z\s]+):$").expect("heading pattern is static");
}

/// The span from the first `{` to the last `}` parsed as a JSON object.
pub fn extract_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Outcome of asking for structured coaching feedback. A reply that is not
/// valid JSON is passed through as raw text instead of being an error.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackOutcome {
    Structured(Value),
    Raw(String),
}

impl FeedbackOutcome {
    pub fn from_reply(reply: String) -> Self {
        match extract_json_object(&reply) {
            Some(value) => FeedbackOutcome::Structured(value),
            None => FeedbackOutcome::Raw(reply),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproverResponse {
    pub improved_version: String,
    pub sections: BTreeMap<String, String>,
}

pub fn parse_improver_response(text: &str) -> ImproverResponse {
    let mut sections: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    let mut current = GENERAL_SECTION.to_string();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(captures) = HEADING.captures(trimmed) {
            current = captures[1].trim().to_string();
            sections.entry(current.clone()).or_default();
            continue;
        }
        sections.entry(current.clone()).or_default().push(trimmed);
    }

    let improved_version = VERSION_HEADINGS
        .iter()
        .find_map(|heading| sections.get(*heading))
        .map(|lines| lines.join("\n"))
        .unwrap_or_default();

    ImproverResponse {
        improved_version,
        sections: sections
            .into_iter()
            .map(|(heading, lines)| (heading, lines.join("\n")))
            .collect(),
    }
}
