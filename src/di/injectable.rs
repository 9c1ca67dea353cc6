use crate::di::Container;
use crate::error::Result;

/// Trait for types that construct themselves from the DI container.
///
/// Controllers implement this so the [`Inject`](crate::di::Inject) extractor
/// can build a fresh instance for every request, resolving shared services
/// from the container.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use axum_controllers::{Container, Injectable, Result};
///
/// struct ItemStore;
///
/// struct ItemController {
///     store: Arc<ItemStore>,
/// }
///
/// impl Injectable for ItemController {
///     fn inject(container: &Container) -> Result<Self> {
///         Ok(Self {
///             store: container.resolve()?,
///         })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Create an instance by resolving dependencies from the container.
    ///
    /// # Errors
    /// Returns an error if any required dependency is not registered.
    fn inject(container: &Container) -> Result<Self>;
}
