use async_trait::async_trait;

use crate::{pagination::types::PagePosition, Result};

/// Acknowledges a single interaction (e.g. a deferred update).
#[async_trait]
pub trait Acknowledge: Send + Sync {
    async fn acknowledge(&self) -> Result<()>;
}

/// The message a session drives.
///
/// Both operations are best-effort from the controller's side: errors are
/// logged and never end the session.
#[async_trait]
pub trait PageView<P: Sync>: Send + Sync {
    async fn render(&self, page: &P, position: PagePosition, controls_enabled: bool) -> Result<()>;

    async fn delete(&self) -> Result<()>;
}
