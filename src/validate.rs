//! Schema validation for normalized model output. Produces exactly one of
//! `CampaignDraft`, `MalformedPayload`, or `SchemaMismatch`; a payload is
//! never half-trusted. The check is intentionally shallow: block internals
//! are not validated field-by-field.

use serde_json::Value;

use crate::campaign::{slugify, CampaignDraft, DOC_TYPE};
use crate::error::ValidationError;

/// Parse `text` and check the campaign contract.
pub fn validate(text: &str) -> Result<CampaignDraft, ValidationError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ValidationError::MalformedPayload {
        raw: text.to_string(),
    })?;

    if let Err(reason) = check_shape(&value) {
        return Err(ValidationError::SchemaMismatch {
            payload: value,
            reason,
        });
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError::SchemaMismatch {
        payload: value,
        reason: e.to_string(),
    })
}

fn check_shape(v: &Value) -> Result<(), String> {
    if v.get("_type").and_then(Value::as_str) != Some(DOC_TYPE) {
        return Err(format!("`_type` must be \"{DOC_TYPE}\""));
    }

    require_non_empty_str(v.get("title"), "title")?;
    require_non_empty_str(v.get("slug").and_then(|s| s.get("current")), "slug.current")?;
    require_non_empty_str(v.get("headline"), "headline")?;

    // The stored slug is derived server-side, title first. A document whose
    // title and proposed slug both slugify to nothing would be unreachable
    // by the storefront's slug lookup, so it is rejected here.
    let title = v.get("title").and_then(Value::as_str).unwrap_or_default();
    let proposed = v
        .get("slug")
        .and_then(|s| s.get("current"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if slugify(title).is_empty() && slugify(proposed).is_empty() {
        return Err("no URL-safe slug derivable from `title` or `slug.current`".to_string());
    }

    if !v.get("price").map(Value::is_number).unwrap_or(false) {
        return Err("`price` must be a JSON number".to_string());
    }

    let content = v
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| "`content` must be an array".to_string())?;
    if content.is_empty() {
        return Err("`content` must not be empty".to_string());
    }

    // The prompt forbids the model from inventing keys; key injection happens
    // after validation, so any `_key` here means the contract was violated.
    for block in content {
        if block.get("_key").is_some() {
            return Err("`content` blocks must not carry `_key` fields".to_string());
        }
        if let Some(children) = block.get("children").and_then(Value::as_array) {
            if children.iter().any(|c| c.get("_key").is_some()) {
                return Err("`content` spans must not carry `_key` fields".to_string());
            }
        }
    }

    Ok(())
}

fn require_non_empty_str(v: Option<&Value>, field: &str) -> Result<(), String> {
    match v.and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(format!("`{field}` must be a non-empty string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good_payload() -> Value {
        json!({
            "_type": "campaign",
            "title": "AquaPure Flow",
            "slug": { "_type": "slug", "current": "aquapure-flow" },
            "headline": "Hydration engineered for the trail, priced for everyone",
            "price": 49.99,
            "content": [{
                "_type": "block",
                "style": "normal",
                "markDefs": [],
                "children": [{ "_type": "span", "text": "Plastic waste is everywhere.", "marks": [] }]
            }]
        })
    }

    #[test]
    fn accepts_a_well_formed_payload() {
        let draft = validate(&good_payload().to_string()).expect("should validate");
        assert_eq!(draft.title, "AquaPure Flow");
        assert_eq!(draft.slug.current, "aquapure-flow");
        assert_eq!(draft.content.len(), 1);
        assert_eq!(draft.content[0].children[0].text, "Plastic waste is everywhere.");
    }

    #[test]
    fn empty_string_is_malformed() {
        match validate("") {
            Err(ValidationError::MalformedPayload { raw }) => assert_eq!(raw, ""),
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn broken_json_is_malformed_and_carries_the_raw_text() {
        let raw = "{\"title\": \"X\"";
        match validate(raw) {
            Err(ValidationError::MalformedPayload { raw: got }) => assert_eq!(got, raw),
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn missing_title_is_a_schema_mismatch() {
        let mut v = good_payload();
        v.as_object_mut().unwrap().remove("title");
        match validate(&v.to_string()) {
            Err(ValidationError::SchemaMismatch { reason, .. }) => {
                assert!(reason.contains("title"), "reason: {reason}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn string_price_is_a_schema_mismatch() {
        let mut v = good_payload();
        v["price"] = json!("49.99");
        match validate(&v.to_string()) {
            Err(ValidationError::SchemaMismatch { reason, payload }) => {
                assert!(reason.contains("price"), "reason: {reason}");
                assert_eq!(payload["price"], "49.99");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_content_is_a_schema_mismatch() {
        let mut v = good_payload();
        v["content"] = json!([]);
        assert!(matches!(
            validate(&v.to_string()),
            Err(ValidationError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn wrong_document_type_is_a_schema_mismatch() {
        let mut v = good_payload();
        v["_type"] = json!("post");
        assert!(matches!(
            validate(&v.to_string()),
            Err(ValidationError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn premature_keys_are_a_schema_mismatch() {
        let mut v = good_payload();
        v["content"][0]["_key"] = json!("block0");
        match validate(&v.to_string()) {
            Err(ValidationError::SchemaMismatch { reason, .. }) => {
                assert!(reason.contains("_key"), "reason: {reason}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unslugifiable_title_and_slug_are_a_schema_mismatch() {
        let mut v = good_payload();
        v["title"] = json!("好好好");
        v["slug"]["current"] = json!("!!!");
        match validate(&v.to_string()) {
            Err(ValidationError::SchemaMismatch { reason, .. }) => {
                assert!(reason.contains("slug"), "reason: {reason}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unslugifiable_title_with_usable_slug_still_validates() {
        let mut v = good_payload();
        v["title"] = json!("好好好");
        assert!(validate(&v.to_string()).is_ok());
    }

    #[test]
    fn integer_price_is_still_numeric() {
        let mut v = good_payload();
        v["price"] = json!(50);
        let draft = validate(&v.to_string()).expect("integer price should validate");
        assert_eq!(draft.price, 50.0);
    }
}
