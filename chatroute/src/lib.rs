pub mod auth;
pub mod client;
pub mod models;
pub mod providers;
pub mod types;

// Re-exports for convenience
pub use auth::config::{AppConfig, ConfigManager};
pub use auth::{mask_credential, validate_credential, CredentialPolicy, CredentialSet, ValidationError};
pub use client::{AiRouter, AiRouterBuilder, Document};
pub use models::{all_models, find_model, models_for_provider};
pub use providers::{Adapter, Endpoints, ErrorKind, InvocationError};
pub use types::*;
