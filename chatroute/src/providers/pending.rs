use super::{Adapter, InvocationError};
use crate::types::*;
use async_trait::async_trait;

/// Placeholder for a provider we recognize but cannot reach yet (Midjourney
/// has no public HTTP API). Fails without touching the network.
pub struct PendingAdapter {
    provider: ProviderKind,
}

impl PendingAdapter {
    pub fn new(provider: ProviderKind) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Adapter for PendingAdapter {
    async fn invoke(
        &self,
        _model: &ModelDescriptor,
        _conversation: &[Turn],
        _credential: &str,
        _options: &RequestOptions,
    ) -> Result<InvocationResult, InvocationError> {
        Err(InvocationError::NotImplemented { provider: self.provider })
    }

    fn provider(&self) -> ProviderKind {
        self.provider
    }
}
