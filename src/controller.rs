//! Controller trait, explicit registration, and router assembly.
//!
//! A controller groups routes behind shared router configuration. It is
//! never instantiated here: the DI layer constructs an instance per request
//! when a handler asks for `Inject<TheController>`.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::definitions::{self, RouteKind};
use crate::di::{Depends, Injectable};
use crate::error::{Error, Result};
use crate::router::{RouterHandle, RouterParams};
use crate::routing::Route;

/// A class-like grouping of routes.
///
/// `S` is the axum state type the assembled router expects. Implementors
/// declare router configuration through `prefix`/`dependencies`/`tags` (or
/// the explicit [`router_params`](Controller::router_params) overrides, which
/// win per field) and their endpoints through [`routes`](Controller::routes).
///
/// # Example
/// ```ignore
/// impl Controller<AppState> for ItemController {
///     fn prefix() -> &'static str {
///         "/items"
///     }
///
///     fn routes() -> Result<Vec<Route<AppState>>> {
///         Ok(vec![
///             get("").to(Self::list)?,
///             post("").option("status_code", 201).to(Self::create)?,
///         ])
///     }
/// }
/// ```
pub trait Controller<S>: Injectable
where
    S: Clone + Send + Sync + 'static,
{
    /// Path prefix shared by every route of this controller.
    fn prefix() -> &'static str {
        ""
    }

    /// Router-level dependency references.
    fn dependencies() -> Vec<Depends> {
        Vec::new()
    }

    /// Tags applied to every route of this controller.
    fn tags() -> Vec<String> {
        Vec::new()
    }

    /// Explicit router-construction overrides. Fields set here are never
    /// clobbered by the defaults above; unset fields are filled from them.
    fn router_params() -> RouterParams {
        RouterParams::new()
    }

    /// The declared routes. Called once per router build; declaration order
    /// carries no meaning and must not be relied upon.
    fn routes() -> Result<Vec<Route<S>>>;

    /// Register this controller and assemble a fresh router in one step.
    fn create_router() -> Result<RouterHandle<S>>
    where
        Self: Sized,
    {
        register_controller::<Self, S>()?.create_router()
    }
}

/// Register a controller: merge its router params with the class-level
/// defaults, validate the merged mapping against the router constructor
/// signature, and probe the declared routes so configuration errors surface
/// at startup instead of at first request.
///
/// # Errors
/// [`Error::Signature`] when the merged parameters do not bind to the router
/// constructor, or any error produced while declaring the routes.
pub fn register_controller<C, S>() -> Result<ControllerRegistration<C, S>>
where
    C: Controller<S>,
    S: Clone + Send + Sync + 'static,
{
    let params = C::router_params().fill_defaults(C::prefix(), C::dependencies(), C::tags());
    definitions::router_constructor_binding()
        .without_receiver()
        .bind(&[], &params.as_kwargs())?;

    let routes = C::routes()?;
    debug!(
        controller = std::any::type_name::<C>(),
        prefix = params.prefix.as_deref().unwrap_or(""),
        routes = routes.len(),
        "controller registered"
    );

    Ok(ControllerRegistration {
        params,
        _marker: PhantomData,
    })
}

/// A validated controller registration. Each [`create_router`] call produces
/// an independent router with an identical route set.
///
/// [`create_router`]: ControllerRegistration::create_router
pub struct ControllerRegistration<C, S> {
    params: RouterParams,
    _marker: PhantomData<fn() -> (C, S)>,
}

impl<C, S> fmt::Debug for ControllerRegistration<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerRegistration")
            .field("controller", &std::any::type_name::<C>())
            .field("params", &self.params)
            .finish()
    }
}

impl<C, S> ControllerRegistration<C, S>
where
    C: Controller<S>,
    S: Clone + Send + Sync + 'static,
{
    /// The merged router parameters.
    pub fn params(&self) -> &RouterParams {
        &self.params
    }

    /// Construct a router handle and populate it from the declared routes.
    ///
    /// Every endpoint signature is rewritten so its receiver defaults to a
    /// dependency reference on the controller, then the route is registered
    /// according to its definition kind. Registration failures propagate
    /// unmodified; no rollback is attempted.
    pub fn create_router(&self) -> Result<RouterHandle<S>> {
        let mut handle = RouterHandle::new(self.params.clone())?;
        let owner = Depends::on::<C>();

        for route in C::routes()? {
            let (definition, path, options, endpoint, mount) = route.into_parts();
            let rewritten =
                endpoint
                    .signature()
                    .rewrite(owner)
                    .ok_or_else(|| Error::EmptySignature {
                        endpoint: endpoint.name().to_owned(),
                    })?;
            let endpoint = endpoint.with_signature(rewritten);

            match definition.kind() {
                RouteKind::Http(method) => {
                    handle.add_http_route(&path, mount, endpoint, vec![method], options)?;
                }
                RouteKind::Websocket => {
                    handle.add_websocket_route(&path, mount, endpoint, options)?;
                }
            }
        }

        debug!(
            controller = std::any::type_name::<C>(),
            routes = handle.routes().len(),
            "router assembled"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::Container;
    use crate::routing::{get, websocket};
    use crate::signature::{ParamDefault, Signature, SignatureMismatch};
    use serde_json::json;

    struct Probe;

    impl Injectable for Probe {
        fn inject(_container: &Container) -> Result<Self> {
            Ok(Self)
        }
    }

    async fn fake_method() -> &'static str {
        "ok"
    }

    struct FakeController;

    impl Injectable for FakeController {
        fn inject(_container: &Container) -> Result<Self> {
            Ok(Self)
        }
    }

    impl Controller<()> for FakeController {
        fn prefix() -> &'static str {
            "/test"
        }

        fn dependencies() -> Vec<Depends> {
            vec![Depends::on::<Probe>()]
        }

        fn tags() -> Vec<String> {
            vec!["TEST".into()]
        }

        fn router_params() -> RouterParams {
            RouterParams::new()
                .prefix("/override")
                .tags(["override"])
                .set("deprecated", true)
        }

        fn routes() -> Result<Vec<Route<()>>> {
            Ok(vec![
                get("/get").option("deprecated", true).to(fake_method)?,
                websocket("/ws").to(fake_method)?,
            ])
        }
    }

    #[test]
    fn merges_router_params_per_field() {
        let registration = register_controller::<FakeController, ()>().unwrap();
        let kwargs = registration.params().as_kwargs();

        assert_eq!(kwargs["prefix"], json!("/override"));
        assert_eq!(kwargs["tags"], json!(["override"]));
        assert_eq!(kwargs["deprecated"], json!(true));
        assert_eq!(
            kwargs["dependencies"],
            json!([Depends::on::<Probe>().target()])
        );
    }

    #[test]
    fn registrations_are_debug_printable() {
        let registration = register_controller::<FakeController, ()>().unwrap();
        let rendered = format!("{registration:?}");
        assert!(rendered.contains("FakeController"));
        assert!(rendered.contains("/override"));
    }

    #[test]
    fn rejects_unknown_router_params() {
        struct BadParams;

        impl Injectable for BadParams {
            fn inject(_container: &Container) -> Result<Self> {
                Ok(Self)
            }
        }

        impl Controller<()> for BadParams {
            fn router_params() -> RouterParams {
                RouterParams::new().set("bogus", 1)
            }

            fn routes() -> Result<Vec<Route<()>>> {
                Ok(Vec::new())
            }
        }

        let err = register_controller::<BadParams, ()>().unwrap_err();
        assert!(matches!(
            err,
            Error::Signature(SignatureMismatch::UnexpectedKeyword { ref name }) if name == "bogus"
        ));
    }

    #[test]
    fn registration_probes_the_routes() {
        struct BadRoute;

        impl Injectable for BadRoute {
            fn inject(_container: &Container) -> Result<Self> {
                Ok(Self)
            }
        }

        impl Controller<()> for BadRoute {
            fn routes() -> Result<Vec<Route<()>>> {
                Ok(vec![get("/x").option("bogus", true).to(fake_method)?])
            }
        }

        let err = register_controller::<BadRoute, ()>().unwrap_err();
        assert!(matches!(err, Error::Signature(_)));
    }

    #[test]
    fn assembles_and_records_both_route_kinds() {
        let handle = FakeController::create_router().unwrap();
        let routes = handle.routes();
        assert_eq!(routes.len(), 2);

        let http = routes.iter().find(|r| r.path == "/get").unwrap();
        assert_eq!(http.methods, Some(vec![definitions::GET.request_method().unwrap()]));
        assert_eq!(http.options.get("deprecated"), Some(&json!(true)));
        assert_eq!(http.options.get("name"), Some(&json!("fake_method")));

        let ws = routes.iter().find(|r| r.path == "/ws").unwrap();
        assert_eq!(ws.methods, None);
    }

    #[test]
    fn rewrites_endpoint_signatures_during_assembly() {
        let handle = FakeController::create_router().unwrap();
        let endpoint = &handle.routes()[0].endpoint;
        match endpoint.signature().params()[0].default() {
            ParamDefault::Dependency(dep) => assert!(dep.resolves::<FakeController>()),
            other => panic!("expected dependency default, got {other:?}"),
        }
    }

    #[test]
    fn empty_endpoint_signature_is_fatal() {
        struct NoParams;

        impl Injectable for NoParams {
            fn inject(_container: &Container) -> Result<Self> {
                Ok(Self)
            }
        }

        impl Controller<()> for NoParams {
            fn routes() -> Result<Vec<Route<()>>> {
                Ok(vec![
                    get("/x")
                        .signature(Signature::new(Vec::new()))
                        .to(fake_method)?,
                ])
            }
        }

        let err = NoParams::create_router().unwrap_err();
        assert!(matches!(err, Error::EmptySignature { .. }));
    }
}
