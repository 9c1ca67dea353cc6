//! Route builders: one per HTTP verb plus websocket.
//!
//! A builder captures the path and keyword options for a single endpoint,
//! validates them against the bound registration signature, and produces a
//! [`Route`] value once given a handler. Routes are plain records; nothing is
//! registered until a controller router is assembled.

use std::collections::BTreeMap;
use std::fmt;

use axum::handler::Handler;
use axum::routing::{self, MethodFilter, MethodRouter};
use serde::Serialize;
use serde_json::Value;

use crate::definitions::{self, RouteDefinition};
use crate::error::{Error, Result};
use crate::signature::Signature;

const PATH_REQUIRED: &str = "You must provide a path for the route.";

/// Keyword options captured for a route, forwarded verbatim to the router
/// handle at registration time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RouteOptions(BTreeMap<String, Value>);

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RouteOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Reference to an endpoint: its name (derived from the handler's type path)
/// and its declared parameter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointRef {
    name: &'static str,
    signature: Signature,
}

impl EndpointRef {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn with_signature(&self, signature: Signature) -> Self {
        Self {
            name: self.name,
            signature,
        }
    }
}

/// Type-erased handler constructor: given a method filter, yields the
/// mountable axum method router for the endpoint. Callable repeatedly so a
/// registration can build any number of independent routers.
pub type MountFn<S> = Box<dyn Fn(MethodFilter) -> MethodRouter<S> + Send + Sync>;

/// One declared route: the operation definition, the captured arguments, and
/// the endpoint to invoke. Read-only after construction.
pub struct Route<S> {
    definition: &'static RouteDefinition,
    path: String,
    args: Vec<Value>,
    options: RouteOptions,
    endpoint: EndpointRef,
    mount: MountFn<S>,
}

impl<S> Route<S> {
    pub fn definition(&self) -> &'static RouteDefinition {
        self.definition
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    pub fn endpoint(&self) -> &EndpointRef {
        &self.endpoint
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        &'static RouteDefinition,
        String,
        RouteOptions,
        EndpointRef,
        MountFn<S>,
    ) {
        (
            self.definition,
            self.path,
            self.options,
            self.endpoint,
            self.mount,
        )
    }
}

// The mount closure has no useful rendering; everything else is shown.
impl<S> fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("definition", &self.definition)
            .field("path", &self.path)
            .field("args", &self.args)
            .field("options", &self.options)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Captures the arguments of one route declaration before the endpoint is
/// attached.
pub struct RouteBuilder {
    definition: &'static RouteDefinition,
    args: Vec<Value>,
    options: RouteOptions,
    signature: Option<Signature>,
}

impl RouteBuilder {
    fn new(definition: &'static RouteDefinition, path: impl Into<String>) -> Self {
        Self {
            definition,
            args: vec![Value::String(path.into())],
            options: RouteOptions::new(),
            signature: None,
        }
    }

    /// Build from raw positional arguments and options.
    ///
    /// # Errors
    /// [`Error::Usage`] when the first positional argument is missing or is
    /// not a path string.
    pub fn from_args(
        definition: &'static RouteDefinition,
        args: Vec<Value>,
        options: RouteOptions,
    ) -> Result<Self> {
        if !args.first().is_some_and(Value::is_string) {
            return Err(Error::usage(PATH_REQUIRED));
        }
        Ok(Self {
            definition,
            args,
            options,
            signature: None,
        })
    }

    /// Add a keyword option. Options are validated against the bound
    /// registration signature when the endpoint is attached.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name, value);
        self
    }

    /// Declare the endpoint's parameter list. Defaults to a lone receiver
    /// parameter when not declared.
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Attach the endpoint handler, producing the route record.
    ///
    /// # Errors
    /// [`Error::Usage`] when no path was captured, or
    /// [`Error::Signature`] when the captured arguments do not bind to the
    /// target registration signature.
    pub fn to<H, T, S>(self, endpoint: H) -> Result<Route<S>>
    where
        H: Handler<T, S> + Clone + Send + Sync + 'static,
        T: 'static,
        S: Clone + Send + Sync + 'static,
    {
        let path = self
            .args
            .first()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| Error::usage(PATH_REQUIRED))?;
        self.definition
            .binds()
            .without_receiver()
            .bind(&self.args, self.options.as_map())?;

        let endpoint_ref = EndpointRef {
            name: short_type_name::<H>(),
            signature: self.signature.unwrap_or_else(Signature::receiver_only),
        };
        let mount: MountFn<S> = Box::new(move |filter| routing::on(filter, endpoint.clone()));

        Ok(Route {
            definition: self.definition,
            path,
            args: self.args,
            options: self.options,
            endpoint: endpoint_ref,
            mount,
        })
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

pub fn delete(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::DELETE, path)
}

pub fn get(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::GET, path)
}

pub fn head(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::HEAD, path)
}

pub fn options(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::OPTIONS, path)
}

pub fn patch(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::PATCH, path)
}

pub fn post(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::POST, path)
}

pub fn put(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::PUT, path)
}

pub fn trace(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::TRACE, path)
}

pub fn websocket(path: impl Into<String>) -> RouteBuilder {
    RouteBuilder::new(&definitions::WEBSOCKET, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::{RequestMethod, RouteKind};
    use crate::signature::SignatureMismatch;
    use serde_json::json;

    async fn fake_endpoint() -> &'static str {
        "ok"
    }

    #[test]
    fn enforces_the_path_argument() {
        let err =
            RouteBuilder::from_args(&definitions::GET, Vec::new(), RouteOptions::new())
                .err()
                .expect("missing path must be rejected");
        assert!(matches!(err, Error::Usage(msg) if msg == PATH_REQUIRED));

        let err = RouteBuilder::from_args(
            &definitions::GET,
            vec![json!(42)],
            RouteOptions::new(),
        )
        .err()
        .expect("non-string path must be rejected");
        assert!(matches!(err, Error::Usage(msg) if msg == PATH_REQUIRED));
    }

    #[test]
    fn captures_path_and_options() {
        let route: Route<()> = get("/test")
            .option("deprecated", true)
            .option("name", "listing")
            .to(fake_endpoint)
            .unwrap();

        assert_eq!(route.path(), "/test");
        assert_eq!(route.args(), &[json!("/test")]);
        assert_eq!(route.options().get("deprecated"), Some(&json!(true)));
        assert_eq!(route.options().get("name"), Some(&json!("listing")));
        assert_eq!(route.endpoint().name(), "fake_endpoint");
    }

    #[test]
    fn rejects_unsupported_options() {
        let err = get("/test")
            .option("bogus", true)
            .to::<_, _, ()>(fake_endpoint)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Signature(SignatureMismatch::UnexpectedKeyword { ref name }) if name == "bogus"
        ));
    }

    #[test]
    fn websocket_rejects_http_only_options() {
        let err = websocket("/ws")
            .option("status_code", 201)
            .to::<_, _, ()>(fake_endpoint)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Signature(SignatureMismatch::UnexpectedKeyword { .. })
        ));
    }

    #[test]
    fn each_builder_binds_its_verb() {
        let builders = [
            (delete("/x"), RequestMethod::Delete),
            (get("/x"), RequestMethod::Get),
            (head("/x"), RequestMethod::Head),
            (options("/x"), RequestMethod::Options),
            (patch("/x"), RequestMethod::Patch),
            (post("/x"), RequestMethod::Post),
            (put("/x"), RequestMethod::Put),
            (trace("/x"), RequestMethod::Trace),
        ];
        for (builder, method) in builders {
            assert_eq!(builder.definition.kind(), RouteKind::Http(method));
        }
        assert_eq!(websocket("/x").definition.kind(), RouteKind::Websocket);
    }

    #[test]
    fn routes_are_debug_printable() {
        let route: Route<()> = get("/test").to(fake_endpoint).unwrap();
        let rendered = format!("{route:?}");
        assert!(rendered.contains("/test"));
        assert!(rendered.contains("fake_endpoint"));
    }

    #[test]
    fn declared_signature_is_kept_on_the_record() {
        use crate::signature::Param;

        let route: Route<()> = get("/test")
            .signature(Signature::new(vec![
                Param::required("self"),
                Param::required("item_id"),
            ]))
            .to(fake_endpoint)
            .unwrap();
        assert_eq!(route.endpoint().signature().params().len(), 2);
    }
}
