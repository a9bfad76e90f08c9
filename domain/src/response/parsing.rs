//! Decision response parsing

use crate::review::{ProposedDecision, Verdict};
use serde_json::{Map, Value};
use thiserror::Error;

/// Model output that could not be turned into a decision
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionParseError {
    #[error("no JSON object found in model output")]
    NoJsonObject,

    #[error("invalid JSON in model output: {0}")]
    InvalidJson(String),

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("invalid field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Parse the model's JSON decision.
///
/// The object is taken from the first `{` to the last `}`, so prose or
/// markdown code fences around it are tolerated. `decision`, `rationale`,
/// `citations` and `confidence` are required; `required_actions` may be
/// omitted, and its entries may be plain strings or
/// `{"action": ..., "description": ...}` objects. `confidence` is clamped
/// to [0, 1].
///
/// Never falls back to a default verdict.
pub fn parse_decision_response(response: &str) -> Result<ProposedDecision, DecisionParseError> {
    let json_str = extract_json_object(response).ok_or(DecisionParseError::NoJsonObject)?;

    let object: Map<String, Value> = serde_json::from_str(json_str)
        .map_err(|e| DecisionParseError::InvalidJson(e.to_string()))?;

    let decision = parse_verdict(&object)?;
    let rationale = required_str(&object, "rationale")?.trim().to_string();
    if rationale.is_empty() {
        return Err(invalid("rationale", "must not be empty"));
    }
    let citations = parse_citations(&object)?;
    let required_actions = parse_required_actions(&object)?;
    let confidence = parse_confidence(&object)?;

    Ok(ProposedDecision {
        decision,
        rationale,
        citations,
        required_actions,
        confidence,
    })
}

fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response[start..].rfind('}')?;
    Some(&response[start..start + end + 1])
}

fn invalid(field: &'static str, reason: impl Into<String>) -> DecisionParseError {
    DecisionParseError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, DecisionParseError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(DecisionParseError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecisionParseError> {
    required(object, field)?
        .as_str()
        .ok_or_else(|| invalid(field, "expected a string"))
}

fn parse_verdict(object: &Map<String, Value>) -> Result<Verdict, DecisionParseError> {
    required_str(object, "decision")?
        .parse::<Verdict>()
        .map_err(|e| invalid("decision", e))
}

fn parse_citations(object: &Map<String, Value>) -> Result<Vec<String>, DecisionParseError> {
    let Value::Array(items) = required(object, "citations")? else {
        return Err(invalid("citations", "expected an array"));
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| invalid("citations", "expected an array of strings"))
        })
        .collect()
}

fn parse_required_actions(object: &Map<String, Value>) -> Result<Vec<String>, DecisionParseError> {
    let items = match object.get("required_actions") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid("required_actions", "expected an array")),
    };

    let mut actions = Vec::with_capacity(items.len());
    for item in items {
        let action = match item {
            Value::String(s) => s.trim().to_string(),
            Value::Object(fields) => action_from_object(fields)?,
            _ => {
                return Err(invalid(
                    "required_actions",
                    "entries must be strings or objects",
                ));
            }
        };
        if !action.is_empty() {
            actions.push(action);
        }
    }
    Ok(actions)
}

/// `{"action": "a", "description": "d"}` becomes `"a: d"`
fn action_from_object(fields: &Map<String, Value>) -> Result<String, DecisionParseError> {
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    match (text("action"), text("description")) {
        (Some(action), Some(description)) => Ok(format!("{}: {}", action, description)),
        (Some(action), None) => Ok(action.to_string()),
        (None, Some(description)) => Ok(description.to_string()),
        (None, None) => Err(invalid(
            "required_actions",
            "object entries need an 'action' or 'description'",
        )),
    }
}

fn parse_confidence(object: &Map<String, Value>) -> Result<f64, DecisionParseError> {
    let confidence = required(object, "confidence")?
        .as_f64()
        .ok_or_else(|| invalid("confidence", "expected a number"))?;
    if !confidence.is_finite() {
        return Err(invalid("confidence", "must be finite"));
    }
    Ok(confidence.clamp(0.0, 1.0))
}
