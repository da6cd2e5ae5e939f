// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod campaign;
pub mod config;
pub mod error;
pub mod generate;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod store;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::campaign::{Campaign, CampaignDraft, NewCampaign};
pub use crate::error::{GenerateError, ProviderError, StoreError, ValidationError};
pub use crate::generate::generate_campaign;
