//! Driven port consulted by the readiness probe.

use async_trait::async_trait;

/// Reports whether a backing dependency can currently serve traffic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// `true` when the dependency answered.
    async fn is_ready(&self) -> bool;
}
