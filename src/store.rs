//! Content store: the Sanity-style document backend the storefront reads.
//! `SanityStore` talks to the hosted HTTP API; `MemoryStore` backs tests and
//! credential-free local runs.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::campaign::{Campaign, NewCampaign};
use crate::config::StoreConfig;
use crate::error::StoreError;

/// GROQ strings mirrored from the storefront pages.
const LIST_QUERY: &str = r#"*[_type == "campaign"] | order(_createdAt desc)"#;
const BY_SLUG_QUERY: &str = r#"*[_type == "campaign" && slug.current == $slug][0]"#;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Create a new document and return the stored representation (with the
    /// store-assigned id and creation timestamp). Not idempotent.
    async fn create(&self, doc: NewCampaign) -> Result<Campaign, StoreError>;
    /// All campaigns, creation-descending.
    async fn list(&self) -> Result<Vec<Campaign>, StoreError>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Campaign>, StoreError>;
}

/// Trait object used by the handlers and tests.
pub type DynStore = Arc<dyn ContentStore>;

/// Factory: build the store backend the config names ("sanity" | "memory").
pub fn build_store(config: &StoreConfig) -> DynStore {
    match config.backend.as_str() {
        "sanity" => Arc::new(SanityStore::new(
            config.project_id.clone(),
            config.dataset.clone(),
            config.api_version.clone(),
            config.token.clone(),
        )),
        _ => Arc::new(MemoryStore::new()),
    }
}

// ------------------------------------------------------------
// Hosted store
// ------------------------------------------------------------

pub struct SanityStore {
    http: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    token: String,
}

impl SanityStore {
    pub fn new(project_id: String, dataset: String, api_version: String, token: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("campaign-forge/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            project_id,
            dataset,
            api_version,
            token,
        }
    }

    // Mutations must bypass the CDN host.
    fn mutate_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            self.project_id, self.api_version, self.dataset
        )
    }

    fn query_url(&self) -> String {
        format!(
            "https://{}.api.sanity.io/v{}/data/query/{}",
            self.project_id, self.api_version, self.dataset
        )
    }
}

#[derive(Deserialize)]
struct MutateResponse {
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Deserialize)]
struct MutateResult {
    document: Option<Campaign>,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn create(&self, doc: NewCampaign) -> Result<Campaign, StoreError> {
        let body = json!({ "mutations": [{ "create": doc }] });

        let resp = self
            .http
            .post(self.mutate_url())
            .query(&[("returnDocuments", "true")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(StoreError::new(format!(
                "store returned HTTP {status}: {detail}"
            )));
        }

        let parsed: MutateResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        parsed
            .results
            .into_iter()
            .next()
            .and_then(|r| r.document)
            .ok_or_else(|| StoreError::new("mutation response contained no document"))
    }

    async fn list(&self) -> Result<Vec<Campaign>, StoreError> {
        let resp = self
            .http
            .get(self.query_url())
            .query(&[("query", LIST_QUERY)])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(StoreError::new(format!(
                "store returned HTTP {status}: {detail}"
            )));
        }

        let parsed: QueryResponse<Vec<Campaign>> = resp
            .json()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(parsed.result)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Campaign>, StoreError> {
        // GROQ params are JSON-encoded in the query string.
        let slug_param =
            serde_json::to_string(slug).map_err(|e| StoreError::new(e.to_string()))?;

        let resp = self
            .http
            .get(self.query_url())
            .query(&[("query", BY_SLUG_QUERY), ("$slug", slug_param.as_str())])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(StoreError::new(format!(
                "store returned HTTP {status}: {detail}"
            )));
        }

        let parsed: QueryResponse<Option<Campaign>> = resp
            .json()
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;
        Ok(parsed.result)
    }
}

// ------------------------------------------------------------
// In-process store
// ------------------------------------------------------------

/// Mutex-guarded in-memory store. Assigns synthetic ids and timestamps so
/// the rest of the pipeline sees the same shape the hosted store returns.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Vec<Campaign>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create(&self, doc: NewCampaign) -> Result<Campaign, StoreError> {
        let mut docs = self.docs.lock().expect("poisoned store");
        let stored = Campaign {
            id: format!("campaign-{}", docs.len()),
            created_at: Utc::now(),
            kind: doc.kind,
            title: doc.title,
            slug: doc.slug,
            headline: doc.headline,
            price: doc.price,
            content: doc.content,
        };
        docs.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Campaign>, StoreError> {
        let docs = self.docs.lock().expect("poisoned store");
        // Insertion order is creation order; newest first.
        Ok(docs.iter().rev().cloned().collect())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Campaign>, StoreError> {
        let docs = self.docs.lock().expect("poisoned store");
        Ok(docs.iter().find(|c| c.slug.current == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{inject_keys, DraftBlock, DraftSpan, Slug, DOC_TYPE};

    fn new_campaign(title: &str, slug: &str) -> NewCampaign {
        let blocks = vec![DraftBlock {
            kind: "block".to_string(),
            style: "normal".to_string(),
            mark_defs: Vec::new(),
            children: vec![DraftSpan {
                kind: "span".to_string(),
                text: "copy".to_string(),
                marks: Vec::new(),
            }],
        }];
        NewCampaign {
            kind: DOC_TYPE.to_string(),
            title: title.to_string(),
            slug: Slug::new(slug),
            headline: "headline".to_string(),
            price: 10.0,
            content: inject_keys(blocks),
        }
    }

    #[tokio::test]
    async fn memory_store_assigns_ids_and_lists_newest_first() {
        let store = MemoryStore::new();
        let a = store.create(new_campaign("A", "a")).await.unwrap();
        let b = store.create(new_campaign("B", "b")).await.unwrap();
        assert_ne!(a.id, b.id);

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "B");
        assert_eq!(listed[1].title, "A");
    }

    #[tokio::test]
    async fn memory_store_finds_by_slug() {
        let store = MemoryStore::new();
        store.create(new_campaign("A", "a")).await.unwrap();

        let hit = store.get_by_slug("a").await.unwrap();
        assert_eq!(hit.map(|c| c.title), Some("A".to_string()));
        assert!(store.get_by_slug("missing").await.unwrap().is_none());
    }

    #[test]
    fn sanity_urls_target_the_configured_project_and_dataset() {
        let store = SanityStore::new(
            "abc123".to_string(),
            "production".to_string(),
            "2025-01-01".to_string(),
            "token".to_string(),
        );
        assert_eq!(
            store.mutate_url(),
            "https://abc123.api.sanity.io/v2025-01-01/data/mutate/production"
        );
        assert_eq!(
            store.query_url(),
            "https://abc123.api.sanity.io/v2025-01-01/data/query/production"
        );
    }
}
