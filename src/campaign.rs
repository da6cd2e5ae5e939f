//! Campaign document model shared by the pipeline and the content store.
//! Serialized field names follow the store's document convention
//! (`_type`, `_key`, `_id`, `_createdAt`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document-type tag expected on every campaign payload.
pub const DOC_TYPE: &str = "campaign";

fn slug_type() -> String {
    "slug".to_string()
}
fn span_type() -> String {
    "span".to_string()
}
fn block_type() -> String {
    "block".to_string()
}
fn normal_style() -> String {
    "normal".to_string()
}

/// `{ "_type": "slug", "current": "..." }` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug {
    #[serde(rename = "_type", default = "slug_type")]
    pub kind: String,
    pub current: String,
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            kind: slug_type(),
            current: current.into(),
        }
    }
}

/// One inline run of campaign prose, as the model emits it (no key yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSpan {
    #[serde(rename = "_type", default = "span_type")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// One paragraph, as the model emits it (no key yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftBlock {
    #[serde(rename = "_type", default = "block_type")]
    pub kind: String,
    #[serde(default = "normal_style")]
    pub style: String,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<serde_json::Value>,
    #[serde(default)]
    pub children: Vec<DraftSpan>,
}

/// Span carrying its in-document-unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSpan {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type", default = "span_type")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Block carrying its in-document-unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type", default = "block_type")]
    pub kind: String,
    #[serde(default = "normal_style")]
    pub style: String,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<serde_json::Value>,
    pub children: Vec<ContentSpan>,
}

/// Validated model output before key injection. Transient.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub slug: Slug,
    pub headline: String,
    pub price: f64,
    pub content: Vec<DraftBlock>,
}

/// Keyed document ready for the store's create operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCampaign {
    #[serde(rename = "_type")]
    pub kind: String,
    pub title: String,
    pub slug: Slug,
    pub headline: String,
    pub price: f64,
    pub content: Vec<ContentBlock>,
}

impl NewCampaign {
    /// Build the store-ready document from a validated draft: derive the slug
    /// server-side from the title (the model's proposal is not trusted to be
    /// URL-safe) and key every block and span. A title with no ASCII
    /// alphanumerics falls back to slugifying the model's proposed slug;
    /// validation guarantees at least one of the two is derivable.
    pub fn from_draft(draft: CampaignDraft) -> Self {
        let mut current = slugify(&draft.title);
        if current.is_empty() {
            current = slugify(&draft.slug.current);
        }
        let slug = Slug::new(current);
        Self {
            kind: DOC_TYPE.to_string(),
            title: draft.title,
            slug,
            headline: draft.headline,
            price: draft.price,
            content: inject_keys(draft.content),
        }
    }
}

/// Stored campaign: the create payload plus the store-assigned id and
/// creation timestamp. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_type")]
    pub kind: String,
    pub title: String,
    pub slug: Slug,
    pub headline: String,
    pub price: f64,
    pub content: Vec<ContentBlock>,
}

/// Assign `_key` values to every block and span. Positional indices are the
/// sole uniqueness source, so the output is deterministic and keys are
/// guaranteed unique within the document. Order and content pass through
/// unchanged. Runs after validation, before persistence.
pub fn inject_keys(content: Vec<DraftBlock>) -> Vec<ContentBlock> {
    content
        .into_iter()
        .enumerate()
        .map(|(bi, block)| ContentBlock {
            key: format!("block{bi}"),
            kind: block.kind,
            style: block.style,
            mark_defs: block.mark_defs,
            children: block
                .children
                .into_iter()
                .enumerate()
                .map(|(ci, span)| ContentSpan {
                    key: format!("span{bi}x{ci}"),
                    kind: span.kind,
                    text: span.text,
                    marks: span.marks,
                })
                .collect(),
        })
        .collect()
}

/// Derive a URL-safe slug from a title: ASCII lowercase letters, digits, and
/// single hyphens; no leading or trailing hyphen.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut prev_hyphen = true; // suppress a leading hyphen
    for ch in title.chars() {
        let c = ch.to_ascii_lowercase();
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            out.push('-');
            prev_hyphen = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn span(text: &str) -> DraftSpan {
        DraftSpan {
            kind: span_type(),
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    fn block(texts: &[&str]) -> DraftBlock {
        DraftBlock {
            kind: block_type(),
            style: normal_style(),
            mark_defs: Vec::new(),
            children: texts.iter().map(|t| span(t)).collect(),
        }
    }

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("AquaPure Flow Bottle"), "aquapure-flow-bottle");
        assert_eq!(slugify("  Solar! Charger 2.0  "), "solar-charger-2-0");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn slugify_output_is_url_safe() {
        let s = slugify("Éco WÄTER / Bottle #1");
        assert!(s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!s.starts_with('-') && !s.ends_with('-'));
    }

    #[test]
    fn inject_keys_preserves_order_and_content() {
        let content = vec![block(&["first"]), block(&["second", "third"])];
        let keyed = inject_keys(content);

        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed[0].children[0].text, "first");
        assert_eq!(keyed[1].children[0].text, "second");
        assert_eq!(keyed[1].children[1].text, "third");
        assert_eq!(keyed[0].style, "normal");
    }

    #[test]
    fn inject_keys_yields_unique_keys_within_document() {
        let content = vec![block(&["a"]), block(&["b"]), block(&["c", "d"])];
        let keyed = inject_keys(content);

        let mut keys = BTreeSet::new();
        for b in &keyed {
            assert!(keys.insert(b.key.clone()), "duplicate block key {}", b.key);
            for s in &b.children {
                assert!(keys.insert(s.key.clone()), "duplicate span key {}", s.key);
            }
        }
    }

    #[test]
    fn inject_keys_is_deterministic() {
        let content = vec![block(&["x"]), block(&["y"])];
        let a = inject_keys(content.clone());
        let b = inject_keys(content);
        assert_eq!(a, b);
    }

    #[test]
    fn from_draft_derives_slug_from_title() {
        let draft = CampaignDraft {
            title: "Glacier Mist Bottle".to_string(),
            slug: Slug::new("Whatever The Model Said"),
            headline: "Hydration that keeps up".to_string(),
            price: 39.99,
            content: vec![block(&["p"])],
        };
        let doc = NewCampaign::from_draft(draft);
        assert_eq!(doc.kind, DOC_TYPE);
        assert_eq!(doc.slug.current, "glacier-mist-bottle");
        assert_eq!(doc.content[0].key, "block0");
        assert_eq!(doc.content[0].children[0].key, "span0x0");
    }

    #[test]
    fn from_draft_falls_back_to_the_model_slug_for_unslugifiable_titles() {
        let draft = CampaignDraft {
            title: "好好好".to_string(),
            slug: Slug::new("Premium Tea Set"),
            headline: "A headline".to_string(),
            price: 59.0,
            content: vec![block(&["p"])],
        };
        let doc = NewCampaign::from_draft(draft);
        assert_eq!(doc.slug.current, "premium-tea-set");
    }
}
