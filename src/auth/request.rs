//! Read-only view of the request being authenticated

use http::header::HOST;
use http::{HeaderMap, Method, Request, Uri};

/// Anything that looks like an incoming HTTP request
///
/// Implemented for `http::Request<B>` and `http::request::Parts`, which
/// covers axum, hyper and tower services.
pub trait IncomingRequest {
    /// HTTP method
    fn method(&self) -> &Method;

    /// Request URI as received (often path-only on the server side)
    fn uri(&self) -> &Uri;

    /// Request headers
    fn headers(&self) -> &HeaderMap;

    /// Absolute request URL
    ///
    /// Server-side URIs usually carry only the path, so the scheme and
    /// authority are rebuilt from `x-forwarded-proto` and `Host`.
    fn url(&self) -> String {
        let uri = self.uri();
        if uri.scheme().is_some() && uri.authority().is_some() {
            return uri.to_string();
        }

        let Some(host) = self.headers().get(HOST).and_then(|v| v.to_str().ok()) else {
            return uri.to_string();
        };

        let scheme = self
            .headers()
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        let path = uri.path_and_query().map_or("/", |pq| pq.as_str());

        format!("{scheme}://{host}{path}")
    }
}

impl<B> IncomingRequest for Request<B> {
    fn method(&self) -> &Method {
        Request::method(self)
    }

    fn uri(&self) -> &Uri {
        Request::uri(self)
    }

    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }
}

impl IncomingRequest for http::request::Parts {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
