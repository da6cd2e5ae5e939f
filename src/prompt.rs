//! Prompt construction and response normalization. Both are pure functions;
//! the only precondition is a non-empty topic, enforced by the caller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Render the fixed campaign instruction with the topic embedded verbatim.
/// Identical topics yield identical prompts.
pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"Generate a campaign document for this product topic: "{topic}"

Return ONLY a JSON object that exactly matches this schema:

{{
  "_type": "campaign",
  "title": "<compelling product name, 2-6 words>",
  "slug": {{
    "_type": "slug",
    "current": "<URL-safe slug, lowercase, hyphens only>"
  }},
  "headline": "<punchy marketing tagline, 8-15 words, different from title>",
  "price": <realistic USD price as a JSON number, e.g. 49.99>,
  "content": [
    {{
      "_type": "block",
      "style": "normal",
      "markDefs": [],
      "children": [{{ "_type": "span", "text": "<paragraph text>", "marks": [] }}]
    }}
  ]
}}

Rules:
- Exactly 5 blocks in content (problem -> features -> benefit -> social proof -> CTA)
- All 5 blocks together are roughly 300 words
- Each block has exactly one span child
- markDefs and marks must be empty arrays []
- style must be "normal" on every block
- Do NOT include _key fields
- Do NOT include heroImage
- price must be a JSON number, not a string"#
    )
}

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\n?").expect("leading fence regex"));
static TRAILING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?```\s*$").expect("trailing fence regex"));

/// Strip an optional leading code fence (with optional language tag) and an
/// optional trailing fence, then trim surrounding whitespace. Idempotent.
/// Does not attempt to repair malformed JSON.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_lead = LEADING_FENCE.replace(trimmed, "");
    let without_tail = TRAILING_FENCE.replace(&without_lead, "");
    without_tail.trim().to_string()
}
