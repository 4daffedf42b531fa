//! Edit provider trait.

use crate::edit::types::{EditRequest, EditedImage};
use crate::error::Result;
use async_trait::async_trait;

/// Trait for image-edit providers.
///
/// The session drives this seam so the concrete provider can be swapped out
/// (or stubbed in tests). One call performs exactly one outbound request:
/// no retries, no caching, no deduplication.
#[async_trait]
pub trait EditProvider: Send + Sync {
    /// Edits the request's source image according to its instruction.
    async fn edit(&self, request: &EditRequest) -> Result<EditedImage>;

    /// Returns the name of this provider for display.
    fn name(&self) -> &str;
}
