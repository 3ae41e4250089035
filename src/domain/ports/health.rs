use async_trait::async_trait;

/// Liveness check of a downstream service.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn is_alive(&self) -> bool;
}
