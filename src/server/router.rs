//! Fixed route table.
//!
//! Routes are keyed on the first path segment. The second segment, when
//! present, is the route's only parameter; anything after it is ignored.

use std::sync::Arc;

use log::{debug, warn};

use crate::parser::{HttpRequest, Method};
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::store::FileStore;

/// A route handler. Receives the captured segment, if any, and mutates the
/// response in place.
type RouteFn = fn(&Router, &HttpRequest, Option<&str>, &mut HttpResponse) -> Result<(), Error>;

/// Routes in match order: first-segment literal and its handler.
const ROUTES: &[(&str, RouteFn)] = &[
    ("echo", Router::echo),
    ("user-agent", Router::user_agent),
    ("files", Router::files),
];

/// Dispatches requests to the fixed set of routes.
pub struct Router {
    store: Arc<dyn FileStore>,
}

impl Router {
    /// Create a router serving `/files` from `store`.
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// The route patterns, for logging at startup.
    pub fn describe() -> Vec<&'static str> {
        vec!["/", "/echo/{value}", "/user-agent", "/files/{name}"]
    }

    /// Apply the matching route to `response`.
    ///
    /// Unknown first segments become [`Error::NotFound`].
    pub fn route(&self, request: &HttpRequest, response: &mut HttpResponse) -> Result<(), Error> {
        let mut segments = request.segments();
        let Some(first) = segments.next() else {
            // "/" keeps the default response.
            return Ok(());
        };
        let param = segments.next();

        let (_, handler) = ROUTES
            .iter()
            .find(|(literal, _)| *literal == first)
            .ok_or_else(|| Error::NotFound(request.path.clone()))?;

        handler(self, request, param, response)
    }

    fn echo(&self, request: &HttpRequest, param: Option<&str>, response: &mut HttpResponse) -> Result<(), Error> {
        let value = param.ok_or_else(|| Error::NotFound(request.path.clone()))?;
        response.set_header("Content-Type", "text/plain");
        response.set_body(value.as_bytes());
        Ok(())
    }

    fn user_agent(&self, request: &HttpRequest, _param: Option<&str>, response: &mut HttpResponse) -> Result<(), Error> {
        let user_agent = request
            .get_header("User-Agent")
            .ok_or(Error::MissingHeader("User-Agent"))?;
        response.set_header("Content-Type", "text/plain");
        response.set_body(user_agent.as_bytes());
        Ok(())
    }

    fn files(&self, request: &HttpRequest, param: Option<&str>, response: &mut HttpResponse) -> Result<(), Error> {
        let name = param.ok_or_else(|| Error::NotFound(request.path.clone()))?;
        if name == "." || name == ".." || name.contains('\\') {
            return Err(Error::InvalidFileName(name.to_string()));
        }

        match request.method {
            Method::GET => {
                let contents = self.store.read(name)?;
                debug!("Serving file {name} ({len} bytes)", len = contents.len());
                response.set_header("Content-Type", "application/octet-stream");
                response.set_body(contents);
            }
            Method::POST => {
                check_content_length(request)?;
                self.store.write(name, &request.body)?;
                debug!("Stored file {name} ({len} bytes)", len = request.body.len());
                response.status = StatusCode::Created;
            }
            ref other => {
                warn!("Method {other} not allowed on {path}", path = request.path);
                return Err(Error::MethodNotAllowed(other.to_string(), request.path.clone()));
            }
        }
        Ok(())
    }
}

/// The request must declare `Content-Length` and it must equal the body length.
fn check_content_length(request: &HttpRequest) -> Result<(), Error> {
    let declared = request
        .get_header("Content-Length")
        .ok_or(Error::MissingHeader("Content-Length"))?;
    match declared.parse::<usize>() {
        Ok(len) if len == request.body.len() => Ok(()),
        _ => Err(Error::ContentLengthMismatch {
            declared: declared.to_string(),
            actual: request.body.len(),
        }),
    }
}
