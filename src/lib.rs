//! # axum-controllers
//!
//! Class-based controllers for axum with declarative routing and built-in
//! dependency injection.
//!
//! A controller groups HTTP (and websocket) endpoints behind shared router
//! configuration. Routes are declared with per-verb builders, validated
//! against the router's registration signatures at startup, and assembled
//! into a plain `axum::Router` on demand. Controller instances are built per
//! request by the DI container, FastAPI-style.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_controllers::{
//!     Container, ContainerBuilder, Controller, HasContainer, Inject, Injectable,
//!     Result, Route, get,
//! };
//! use axum::Json;
//!
//! #[derive(Clone)]
//! struct AppState {
//!     container: Arc<Container>,
//! }
//!
//! impl HasContainer for AppState {
//!     fn container(&self) -> &Container {
//!         &self.container
//!     }
//! }
//!
//! // 1. A shared service, registered once at startup.
//! struct ItemStore;
//!
//! impl ItemStore {
//!     fn all(&self) -> Vec<String> {
//!         vec!["screwdriver".into()]
//!     }
//! }
//!
//! // 2. The controller, constructed per request from the container.
//! struct ItemController {
//!     store: Arc<ItemStore>,
//! }
//!
//! impl Injectable for ItemController {
//!     fn inject(container: &Container) -> Result<Self> {
//!         Ok(Self {
//!             store: container.resolve()?,
//!         })
//!     }
//! }
//!
//! async fn list_items(Inject(controller): Inject<ItemController>) -> Json<Vec<String>> {
//!     Json(controller.store.all())
//! }
//!
//! impl Controller<AppState> for ItemController {
//!     fn prefix() -> &'static str {
//!         "/items"
//!     }
//!
//!     fn routes() -> Result<Vec<Route<AppState>>> {
//!         Ok(vec![get("").to(list_items)?])
//!     }
//! }
//!
//! // 3. Assemble the application.
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let container = ContainerBuilder::new().register(ItemStore).build();
//!     let state = AppState {
//!         container: Arc::new(container),
//!     };
//!
//!     let app: axum::Router = ItemController::create_router()?
//!         .into_router()
//!         .with_state(state);
//!
//!     // Serve `app`...
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod definitions;
pub mod di;
pub mod error;
pub mod router;
pub mod routing;
pub mod signature;

// Re-export core types
pub use controller::{Controller, ControllerRegistration, register_controller};
pub use definitions::{RequestMethod, RouteDefinition, RouteKind, definition_for};
pub use di::{Container, ContainerBuilder, Depends, HasContainer, Inject, Injectable};
pub use error::{Error, Result};
pub use router::{RegisteredRoute, RouterHandle, RouterParams};
pub use routing::{
    Route, RouteBuilder, RouteOptions, delete, get, head, options, patch, post, put, trace,
    websocket,
};
pub use signature::{Param, ParamDefault, ParamKind, Signature, SignatureMismatch};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use axum_controllers::prelude::*;
/// ```
pub mod prelude {
    pub use crate::controller::{Controller, ControllerRegistration, register_controller};
    pub use crate::definitions::{RequestMethod, RouteDefinition, RouteKind};
    pub use crate::di::{Container, ContainerBuilder, Depends, HasContainer, Inject, Injectable};
    pub use crate::error::{Error, Result};
    pub use crate::router::{RegisteredRoute, RouterHandle, RouterParams};
    pub use crate::routing::{
        Route, RouteBuilder, RouteOptions, delete, get, head, options, patch, post, put, trace,
        websocket,
    };
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
