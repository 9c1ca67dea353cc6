//! Adapter over `axum::Router` implementing the registration surface the
//! assembler talks to: construct with router params, add HTTP and websocket
//! routes, hand out the populated router.
//!
//! The handle keeps an inspectable record of everything registered through
//! it, so applications (and tests) can enumerate or export the route table.

use std::collections::BTreeMap;
use std::fmt;

use axum::Router;
use axum::routing::MethodFilter;
use serde::Serialize;
use serde_json::Value;

use crate::definitions::RequestMethod;
use crate::di::Depends;
use crate::error::{Error, Result};
use crate::routing::{EndpointRef, MountFn, RouteOptions};

/// Router construction parameters for a controller.
///
/// `prefix`, `dependencies` and `tags` mirror the controller's class-level
/// defaults; `set` carries any additional constructor option. Fields left
/// unset are filled from the controller defaults at registration time, and
/// fields set here always win over those defaults.
#[derive(Debug, Clone, Default)]
pub struct RouterParams {
    pub(crate) prefix: Option<String>,
    pub(crate) dependencies: Option<Vec<Depends>>,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) extra: BTreeMap<String, Value>,
}

impl RouterParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn dependencies(mut self, dependencies: impl IntoIterator<Item = Depends>) -> Self {
        self.dependencies = Some(dependencies.into_iter().collect());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set an additional router-construction option.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Fill unset fields from controller-level defaults. Fields already
    /// present are never clobbered.
    pub(crate) fn fill_defaults(
        mut self,
        prefix: &str,
        dependencies: Vec<Depends>,
        tags: Vec<String>,
    ) -> Self {
        self.prefix.get_or_insert_with(|| prefix.to_owned());
        self.dependencies.get_or_insert(dependencies);
        self.tags.get_or_insert(tags);
        self
    }

    /// The parameter mapping as it is validated against the router
    /// constructor signature and recorded on the handle.
    pub fn as_kwargs(&self) -> BTreeMap<String, Value> {
        let mut kwargs = self.extra.clone();
        if let Some(prefix) = &self.prefix {
            kwargs.insert("prefix".into(), Value::String(prefix.clone()));
        }
        if let Some(dependencies) = &self.dependencies {
            kwargs.insert(
                "dependencies".into(),
                Value::Array(
                    dependencies
                        .iter()
                        .map(|d| Value::String(d.target().to_owned()))
                        .collect(),
                ),
            );
        }
        if let Some(tags) = &self.tags {
            kwargs.insert(
                "tags".into(),
                Value::Array(tags.iter().map(|t| Value::String(t.clone())).collect()),
            );
        }
        kwargs
    }
}

/// Record of one registration performed against a [`RouterHandle`].
///
/// `methods` is present for HTTP routes and absent for websocket routes.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredRoute {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<RequestMethod>>,
    pub endpoint: EndpointRef,
    pub options: RouteOptions,
}

/// A router under construction plus the record of its registrations.
///
/// Paths are mounted with the configured prefix prepended; duplicate-path
/// registrations fail inside axum and propagate unmodified.
pub struct RouterHandle<S> {
    params: RouterParams,
    routes: Vec<RegisteredRoute>,
    inner: Router<S>,
}

// The inner axum router is opaque; params and the registration record carry
// everything worth printing.
impl<S> fmt::Debug for RouterHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterHandle")
            .field("params", &self.params)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl<S> RouterHandle<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Construct an empty handle.
    ///
    /// # Errors
    /// [`Error::Usage`] when the prefix is non-empty and does not start with
    /// `/`, or ends with `/`.
    pub fn new(params: RouterParams) -> Result<Self> {
        let prefix = params.prefix.as_deref().unwrap_or("");
        if !prefix.is_empty() {
            if !prefix.starts_with('/') {
                return Err(Error::usage("A router prefix must start with '/'."));
            }
            if prefix.ends_with('/') {
                return Err(Error::usage("A router prefix must not end with '/'."));
            }
        }
        Ok(Self {
            params,
            routes: Vec::new(),
            inner: Router::new(),
        })
    }

    /// Register an HTTP route for the given request methods.
    ///
    /// The `name` option defaults to the endpoint name when not supplied.
    ///
    /// # Errors
    /// [`Error::Usage`] when `methods` is empty.
    pub fn add_http_route(
        &mut self,
        path: &str,
        mount: MountFn<S>,
        endpoint: EndpointRef,
        methods: Vec<RequestMethod>,
        mut options: RouteOptions,
    ) -> Result<()> {
        let filter = methods
            .iter()
            .map(|m| m.filter())
            .reduce(MethodFilter::or)
            .ok_or_else(|| Error::usage("At least one request method is required."))?;
        if !options.contains("name") {
            options.insert("name", endpoint.name());
        }

        let full = self.full_path(path);
        let inner = std::mem::replace(&mut self.inner, Router::new());
        self.inner = inner.route(&full, mount(filter));
        self.routes.push(RegisteredRoute {
            path: path.to_owned(),
            methods: Some(methods),
            endpoint,
            options,
        });
        Ok(())
    }

    /// Register a websocket route. No request-method option is recorded;
    /// upgrade requests arrive as GET at the transport level.
    pub fn add_websocket_route(
        &mut self,
        path: &str,
        mount: MountFn<S>,
        endpoint: EndpointRef,
        mut options: RouteOptions,
    ) -> Result<()> {
        if !options.contains("name") {
            options.insert("name", endpoint.name());
        }

        let full = self.full_path(path);
        let inner = std::mem::replace(&mut self.inner, Router::new());
        self.inner = inner.route(&full, mount(MethodFilter::GET));
        self.routes.push(RegisteredRoute {
            path: path.to_owned(),
            methods: None,
            endpoint,
            options,
        });
        Ok(())
    }

    pub fn params(&self) -> &RouterParams {
        &self.params
    }

    pub fn prefix(&self) -> &str {
        self.params.prefix.as_deref().unwrap_or("")
    }

    /// Everything registered through this handle, in registration order.
    pub fn routes(&self) -> &[RegisteredRoute] {
        &self.routes
    }

    /// The populated axum router.
    pub fn into_router(self) -> Router<S> {
        self.inner
    }

    fn full_path(&self, path: &str) -> String {
        let full = format!("{}{}", self.prefix(), path);
        if full.is_empty() { "/".to_owned() } else { full }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::get;
    use serde_json::json;

    async fn fake_endpoint() -> &'static str {
        "ok"
    }

    fn sample_route() -> (MountFn<()>, EndpointRef, RouteOptions) {
        let route = get("/sample").to::<_, _, ()>(fake_endpoint).unwrap();
        let (_, _, options, endpoint, mount) = route.into_parts();
        (mount, endpoint, options)
    }

    #[test]
    fn validates_the_prefix_shape() {
        assert!(RouterHandle::<()>::new(RouterParams::new().prefix("items")).is_err());
        assert!(RouterHandle::<()>::new(RouterParams::new().prefix("/items/")).is_err());
        assert!(RouterHandle::<()>::new(RouterParams::new().prefix("/items")).is_ok());
        assert!(RouterHandle::<()>::new(RouterParams::new()).is_ok());
    }

    #[test]
    fn records_http_registrations() {
        let mut handle = RouterHandle::<()>::new(RouterParams::new()).unwrap();
        let (mount, endpoint, options) = sample_route();
        handle
            .add_http_route(
                "/sample",
                mount,
                endpoint,
                vec![RequestMethod::Get],
                options,
            )
            .unwrap();

        let routes = handle.routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/sample");
        assert_eq!(routes[0].methods, Some(vec![RequestMethod::Get]));
        assert_eq!(routes[0].options.get("name"), Some(&json!("fake_endpoint")));
    }

    #[test]
    fn websocket_registrations_carry_no_methods() {
        let mut handle = RouterHandle::<()>::new(RouterParams::new()).unwrap();
        let (mount, endpoint, options) = sample_route();
        handle
            .add_websocket_route("/ws", mount, endpoint, options)
            .unwrap();
        assert_eq!(handle.routes()[0].methods, None);
    }

    #[test]
    fn explicit_name_option_is_preserved() {
        let mut handle = RouterHandle::<()>::new(RouterParams::new()).unwrap();
        let (mount, endpoint, mut options) = sample_route();
        options.insert("name", "custom");
        handle
            .add_http_route("/sample", mount, endpoint, vec![RequestMethod::Get], options)
            .unwrap();
        assert_eq!(handle.routes()[0].options.get("name"), Some(&json!("custom")));
    }

    #[test]
    fn rejects_an_empty_method_list() {
        let mut handle = RouterHandle::<()>::new(RouterParams::new()).unwrap();
        let (mount, endpoint, options) = sample_route();
        let err = handle
            .add_http_route("/sample", mount, endpoint, Vec::new(), options)
            .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
    }

    #[test]
    fn handles_are_debug_printable() {
        let mut handle = RouterHandle::<()>::new(RouterParams::new().prefix("/items")).unwrap();
        let (mount, endpoint, options) = sample_route();
        handle
            .add_http_route("/sample", mount, endpoint, vec![RequestMethod::Get], options)
            .unwrap();
        let rendered = format!("{handle:?}");
        assert!(rendered.contains("/items"));
        assert!(rendered.contains("/sample"));
    }

    #[test]
    fn kwargs_reflect_merged_fields() {
        let params = RouterParams::new()
            .prefix("/items")
            .tags(["items"])
            .set("deprecated", true);
        let kwargs = params.as_kwargs();
        assert_eq!(kwargs["prefix"], json!("/items"));
        assert_eq!(kwargs["tags"], json!(["items"]));
        assert_eq!(kwargs["deprecated"], json!(true));
        assert!(!kwargs.contains_key("dependencies"));
    }

    #[test]
    fn fill_defaults_is_per_field() {
        let params = RouterParams::new()
            .tags(["override"])
            .fill_defaults("/default", Vec::new(), vec!["default".into()]);
        let kwargs = params.as_kwargs();
        assert_eq!(kwargs["prefix"], json!("/default"));
        assert_eq!(kwargs["tags"], json!(["override"]));
    }
}
