use crate::di::{Container, Injectable};
use axum::{
    extract::FromRequestParts,
    http::{StatusCode as HttpStatusCode, request::Parts},
};

/// Trait that application state must implement to expose the DI container.
pub trait HasContainer {
    fn container(&self) -> &Container;
}

/// Axum extractor that builds an [`Injectable`] value per request.
///
/// This is how controller instances reach their endpoints: the router never
/// holds a controller, it holds handlers whose first parameter is
/// `Inject<TheController>`.
///
/// # Example
/// ```ignore
/// async fn get_item(
///     Inject(controller): Inject<ItemController>,
///     Path(id): Path<String>,
/// ) -> Json<Item> {
///     Json(controller.find_one(id).await)
/// }
/// ```
pub struct Inject<T>(pub T);

impl<S, T> FromRequestParts<S> for Inject<T>
where
    S: Send + Sync + HasContainer,
    T: Injectable,
{
    type Rejection = (HttpStatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        T::inject(state.container()).map(Inject).map_err(|e| {
            (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                format!("dependency injection failed: {e}"),
            )
        })
    }
}

impl<T> std::ops::Deref for Inject<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
