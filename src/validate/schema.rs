//! Structural checks over the raw JSON value of a card line
//!
//! These run before the card is deserialized so that a single record can
//! collect every structural problem at once instead of stopping at the
//! first serde error.

use crate::models::{
    Domain, Reason, QA_LEN, REQUIRED_CARD_KEYS, REQUIRED_QA_KEYS, REQUIRED_SOURCE_KEYS,
};
use serde_json::{Map, Value};

/// Fields that must hold strings when present.
const STRING_KEYS: &[&str] = &["id", "evidence_latin", "concept_ja"];

/// Run every structural check, in order, accumulating reasons.
pub fn check_structure(value: &Value) -> Vec<Reason> {
    let Some(obj) = value.as_object() else {
        return vec![Reason::malformed("structure", "record is not a JSON object")];
    };

    let mut reasons = Vec::new();
    check_required_keys(obj, &mut reasons);
    check_domain(obj, &mut reasons);
    check_qa_shape(obj, &mut reasons);
    check_tags(obj, &mut reasons);
    check_locator_gate(obj, &mut reasons);
    reasons
}

fn check_required_keys(obj: &Map<String, Value>, reasons: &mut Vec<Reason>) {
    for key in REQUIRED_CARD_KEYS {
        if !obj.contains_key(*key) {
            reasons.push(Reason::malformed("structure", format!("missing key {}", key)));
        }
    }
    for key in STRING_KEYS {
        if let Some(v) = obj.get(*key) {
            if !v.is_string() {
                reasons.push(Reason::malformed(
                    "structure",
                    format!("{} must be a string", key),
                ));
            }
        }
    }
    if let Some(v) = obj.get("evidence_ja") {
        if !(v.is_string() || v.is_null()) {
            reasons.push(Reason::malformed(
                "structure",
                "evidence_ja must be a string",
            ));
        }
    }

    match obj.get("source") {
        Some(Value::Object(src)) => {
            for key in REQUIRED_SOURCE_KEYS {
                if !src.contains_key(*key) {
                    reasons.push(Reason::malformed(
                        "structure",
                        format!("source missing {}", key),
                    ));
                }
            }
            for key in ["work", "file"] {
                if let Some(v) = src.get(key) {
                    if !v.is_string() {
                        reasons.push(Reason::malformed(
                            "structure",
                            format!("source.{} must be a string", key),
                        ));
                    }
                }
            }
        }
        Some(_) => reasons.push(Reason::malformed("structure", "source must be an object")),
        None => {}
    }
}

fn check_domain(obj: &Map<String, Value>, reasons: &mut Vec<Reason>) {
    let Some(domain) = obj.get("domain") else {
        return;
    };
    let valid = domain
        .as_str()
        .is_some_and(|d| d.parse::<Domain>().is_ok());
    if !valid {
        reasons.push(Reason::malformed("domain", format!("bad domain {}", domain)));
    }
}

fn check_qa_shape(obj: &Map<String, Value>, reasons: &mut Vec<Reason>) {
    let Some(qa) = obj.get("qa") else {
        return;
    };
    let Some(entries) = qa.as_array() else {
        reasons.push(Reason::malformed("qa-shape", "qa must be a list"));
        return;
    };
    if entries.len() != QA_LEN {
        reasons.push(Reason::malformed(
            "qa-shape",
            format!(
                "qa must be a list of length {}, got {}",
                QA_LEN,
                entries.len()
            ),
        ));
    }
    for (i, entry) in entries.iter().enumerate() {
        let Some(entry) = entry.as_object() else {
            reasons.push(Reason::malformed(
                "qa-shape",
                format!("qa[{}] must be an object", i),
            ));
            continue;
        };
        for key in REQUIRED_QA_KEYS {
            match entry.get(*key) {
                None => reasons.push(Reason::malformed(
                    "qa-shape",
                    format!("qa[{}] missing {}", i, key),
                )),
                Some(v) if !v.is_string() => reasons.push(Reason::malformed(
                    "qa-shape",
                    format!("qa[{}].{} must be a string", i, key),
                )),
                Some(_) => {}
            }
        }
    }
}

fn check_tags(obj: &Map<String, Value>, reasons: &mut Vec<Reason>) {
    let Some(tags) = obj.get("tags") else {
        return;
    };
    match tags.as_array() {
        None => reasons.push(Reason::malformed("tags", "tags must be a list")),
        Some(list) if list.is_empty() => {
            reasons.push(Reason::policy("tags", "tags must be non-empty"))
        }
        Some(list) => {
            if list.iter().any(|t| !t.is_string()) {
                reasons.push(Reason::malformed("tags", "tags must be strings"));
            }
        }
    }
}

/// The manual-review anchor. Runs whatever else failed, so an empty
/// locator is always reported.
fn check_locator_gate(obj: &Map<String, Value>, reasons: &mut Vec<Reason>) {
    let text = obj
        .get("source")
        .and_then(|s| s.get("locator"))
        .map(locator_text)
        .unwrap_or_default();
    if text.trim().is_empty() {
        reasons.push(Reason::policy("locator", "missing locator"));
    }
}

/// Line-range text of a raw locator value (string or `{lines: ...}`).
fn locator_text(locator: &Value) -> String {
    match locator {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Object(obj) => obj.get("lines").map(locator_text).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(locator_text)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(","),
        Value::Null | Value::Bool(_) => String::new(),
    }
}
