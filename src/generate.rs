//! Generation pipeline: intake -> prompt -> model -> normalize -> validate ->
//! key injection -> persistence. Pure orchestration over the provider and
//! store seams; no HTTP types here, so the whole chain is testable offline.
//!
//! Control flows strictly forward, once per invocation. A failure at any
//! stage abandons the draft; there is no retry and no partial write.

use metrics::counter;
use tracing::{info, warn};

use crate::campaign::{Campaign, NewCampaign};
use crate::error::GenerateError;
use crate::prompt::{build_prompt, normalize};
use crate::providers::DynProvider;
use crate::store::DynStore;
use crate::validate::validate;

/// Run the pipeline once for `topic`.
pub async fn generate_campaign(
    provider: &DynProvider,
    store: &DynStore,
    topic: &str,
) -> Result<Campaign, GenerateError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerateError::InvalidTopic);
    }

    counter!("campaign_generate_requests_total").increment(1);

    match run(provider, store, topic).await {
        Ok(stored) => {
            info!(id = %stored.id, slug = %stored.slug.current, "campaign published");
            Ok(stored)
        }
        Err(err) => {
            counter!("campaign_generate_failures_total").increment(1);
            warn!(provider = provider.name(), error = %err, "campaign generation failed");
            Err(err)
        }
    }
}

async fn run(
    provider: &DynProvider,
    store: &DynStore,
    topic: &str,
) -> Result<Campaign, GenerateError> {
    let prompt = build_prompt(topic);
    let raw = provider.invoke(&prompt).await?;
    let cleaned = normalize(&raw);
    let draft = validate(&cleaned)?;
    let doc = NewCampaign::from_draft(draft);
    let stored = store.create(doc).await?;
    Ok(stored)
}
