//! Ordered route table and the dispatcher that consults it.
//!
//! Each [`Route`] pairs a set of methods with an anchored path pattern. Named
//! capture groups in the pattern become [`PathParams`]. The first route whose
//! pattern matches the path decides the outcome: its handler runs when the
//! method is allowed, otherwise the request gets a 405. A path no route
//! matches gets a 404.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use bw_core::{Error, Result};
use futures::future::BoxFuture;
use regex::Regex;

use crate::context::AppContext;
use crate::error::AppError;
use crate::routes::{books, health, wiki};

/// A route handler.
pub type Handler =
    fn(AppContext, PathParams, Request) -> BoxFuture<'static, std::result::Result<Response, AppError>>;

/// Values captured from the request path by a route's named groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get), but a missing parameter is an internal error.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::Internal(format!("route has no `{name}` parameter")))
    }
}

/// One entry in the route table.
pub struct Route {
    name: &'static str,
    methods: Vec<Method>,
    pattern: Regex,
    handler: Handler,
}

impl Route {
    pub fn new(
        name: &'static str,
        methods: &[Method],
        pattern: &str,
        handler: Handler,
    ) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::Internal(format!("bad pattern for route {name}: {e}")))?;
        Ok(Self {
            name,
            methods: methods.to_vec(),
            pattern,
            handler,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.pattern.captures(path)?;
        let params = self
            .pattern
            .capture_names()
            .flatten()
            .filter_map(|n| caps.name(n).map(|m| (n.to_owned(), m.as_str().to_owned())))
            .collect();
        Some(PathParams(params))
    }
}

/// Outcome of looking a request up in the table.
pub enum Resolved<'a> {
    Found(&'a Route, PathParams),
    /// The path matched a route that does not accept the method.
    MethodNotAllowed(&'a Route),
    NotFound,
}

/// Routes tried in order; the first matching pattern wins.
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Route names in match order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(Route::name)
    }

    pub fn resolve(&self, method: &Method, path: &str) -> Resolved<'_> {
        for route in &self.routes {
            if let Some(params) = route.captures(path) {
                return if route.methods.contains(method) {
                    Resolved::Found(route, params)
                } else {
                    Resolved::MethodNotAllowed(route)
                };
            }
        }
        Resolved::NotFound
    }

    /// The wiki's routes.
    pub fn wiki() -> Result<Self> {
        let read = [Method::GET, Method::HEAD];

        Ok(Self::new()
            .route(Route::new("health", &read, r"^/health$", |ctx, p, req| {
                Box::pin(health::health(ctx, p, req))
            })?)
            .route(Route::new("listing", &read, r"^/$", |ctx, p, req| {
                Box::pin(wiki::listing(ctx, p, req))
            })?)
            .route(Route::new(
                "view",
                &read,
                r"^/view/(?P<title>[a-zA-Z0-9]+)$",
                |ctx, p, req| Box::pin(wiki::view(ctx, p, req)),
            )?)
            .route(Route::new(
                "edit",
                &[Method::GET, Method::HEAD, Method::POST],
                r"^/edit/(?P<title>[a-zA-Z0-9]+)$",
                |ctx, p, req| Box::pin(wiki::edit(ctx, p, req)),
            )?)
            .route(Route::new(
                "save",
                &[Method::POST],
                r"^/save/(?P<title>[a-zA-Z0-9]+)$",
                |ctx, p, req| Box::pin(wiki::save(ctx, p, req)),
            )?)
            .route(Route::new("books", &read, r"^/books$", |ctx, p, req| {
                Box::pin(books::list_books(ctx, p, req))
            })?)
            .route(Route::new(
                "book",
                &read,
                r"^/books/(?P<id>[0-9]+)$",
                |ctx, p, req| Box::pin(books::get_book(ctx, p, req)),
            )?))
    }
}

/// Axum fallback handler: resolve the request against the route table.
pub async fn dispatch(State(ctx): State<AppContext>, req: Request) -> Response {
    let routes = ctx.routes.clone();
    let path = req.uri().path().to_owned();

    match routes.resolve(req.method(), &path) {
        Resolved::Found(route, params) => {
            tracing::trace!(route = route.name(), path = %path, "Dispatching");
            (route.handler)(ctx, params, req).await.into_response()
        }
        Resolved::MethodNotAllowed(route) => {
            let allow = route
                .methods
                .iter()
                .map(Method::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let mut response =
                (StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed").into_response();
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
            response
        }
        Resolved::NotFound => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
    }
}
