//! Fixed registry of supported route operations and the binding signatures
//! of the router entry points they register through.

use std::sync::LazyLock;

use axum::http::Method;
use axum::routing::MethodFilter;
use serde::Serialize;
use serde_json::{Value, json};
use strum_macros::{Display, EnumIter, EnumString};

use crate::signature::{Param, Signature};

/// HTTP request method supported by the verb builders.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
}

impl RequestMethod {
    pub(crate) fn filter(self) -> MethodFilter {
        match self {
            RequestMethod::Delete => MethodFilter::DELETE,
            RequestMethod::Get => MethodFilter::GET,
            RequestMethod::Head => MethodFilter::HEAD,
            RequestMethod::Options => MethodFilter::OPTIONS,
            RequestMethod::Patch => MethodFilter::PATCH,
            RequestMethod::Post => MethodFilter::POST,
            RequestMethod::Put => MethodFilter::PUT,
            RequestMethod::Trace => MethodFilter::TRACE,
        }
    }

    pub fn http_method(self) -> Method {
        match self {
            RequestMethod::Delete => Method::DELETE,
            RequestMethod::Get => Method::GET,
            RequestMethod::Head => Method::HEAD,
            RequestMethod::Options => Method::OPTIONS,
            RequestMethod::Patch => Method::PATCH,
            RequestMethod::Post => Method::POST,
            RequestMethod::Put => Method::PUT,
            RequestMethod::Trace => Method::TRACE,
        }
    }
}

/// The kind of a route operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Http(RequestMethod),
    Websocket,
}

/// One supported route operation: its kind plus the signature of the router
/// registration entry point it eventually invokes. The signature reference
/// is used for validation only, never for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDefinition {
    kind: RouteKind,
}

impl RouteDefinition {
    const fn http(method: RequestMethod) -> Self {
        Self {
            kind: RouteKind::Http(method),
        }
    }

    const fn websocket() -> Self {
        Self {
            kind: RouteKind::Websocket,
        }
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Request method, for HTTP operations.
    pub fn request_method(&self) -> Option<RequestMethod> {
        match self.kind {
            RouteKind::Http(method) => Some(method),
            RouteKind::Websocket => None,
        }
    }

    /// Signature of the registration entry point this operation binds to.
    pub fn binds(&self) -> &'static Signature {
        match self.kind {
            RouteKind::Http(_) => LazyLock::force(&HTTP_ROUTE_BINDING),
            RouteKind::Websocket => LazyLock::force(&WEBSOCKET_ROUTE_BINDING),
        }
    }
}

pub static DELETE: RouteDefinition = RouteDefinition::http(RequestMethod::Delete);
pub static GET: RouteDefinition = RouteDefinition::http(RequestMethod::Get);
pub static HEAD: RouteDefinition = RouteDefinition::http(RequestMethod::Head);
pub static OPTIONS: RouteDefinition = RouteDefinition::http(RequestMethod::Options);
pub static PATCH: RouteDefinition = RouteDefinition::http(RequestMethod::Patch);
pub static POST: RouteDefinition = RouteDefinition::http(RequestMethod::Post);
pub static PUT: RouteDefinition = RouteDefinition::http(RequestMethod::Put);
pub static TRACE: RouteDefinition = RouteDefinition::http(RequestMethod::Trace);
pub static WEBSOCKET: RouteDefinition = RouteDefinition::websocket();

/// Definition singleton for an HTTP request method.
pub fn definition_for(method: RequestMethod) -> &'static RouteDefinition {
    match method {
        RequestMethod::Delete => &DELETE,
        RequestMethod::Get => &GET,
        RequestMethod::Head => &HEAD,
        RequestMethod::Options => &OPTIONS,
        RequestMethod::Patch => &PATCH,
        RequestMethod::Post => &POST,
        RequestMethod::Put => &PUT,
        RequestMethod::Trace => &TRACE,
    }
}

fn null() -> Value {
    Value::Null
}

/// Signature of [`RouterHandle::add_http_route`](crate::router::RouterHandle)
/// as seen by a route builder: leading receiver, the path, then the keyword
/// options the handle records. The request method is not part of it; the
/// assembler folds it into the registration call.
static HTTP_ROUTE_BINDING: LazyLock<Signature> = LazyLock::new(|| {
    Signature::new(vec![
        Param::required("self"),
        Param::required("path"),
        Param::keyword_optional("name", null()),
        Param::keyword_optional("summary", null()),
        Param::keyword_optional("description", null()),
        Param::keyword_optional("tags", null()),
        Param::keyword_optional("deprecated", json!(false)),
        Param::keyword_optional("status_code", null()),
        Param::keyword_optional("operation_id", null()),
        Param::keyword_optional("include_in_schema", json!(true)),
    ])
});

/// Signature of `add_websocket_route`. No request-method option and a
/// narrower option set.
static WEBSOCKET_ROUTE_BINDING: LazyLock<Signature> = LazyLock::new(|| {
    Signature::new(vec![
        Param::required("self"),
        Param::required("path"),
        Param::keyword_optional("name", null()),
    ])
});

/// Signature of [`RouterHandle::new`](crate::router::RouterHandle), used to
/// validate merged controller router params at registration time.
static ROUTER_CONSTRUCTOR_BINDING: LazyLock<Signature> = LazyLock::new(|| {
    Signature::new(vec![
        Param::required("self"),
        Param::optional("prefix", json!("")),
        Param::optional("dependencies", json!([])),
        Param::optional("tags", json!([])),
        Param::keyword_optional("deprecated", null()),
        Param::keyword_optional("include_in_schema", json!(true)),
    ])
});

pub(crate) fn router_constructor_binding() -> &'static Signature {
    LazyLock::force(&ROUTER_CONSTRUCTOR_BINDING)
}
