// src/web/extract.rs
// Request extractors: caller address, preferred response format, and the
// submitted operand form

use axum::{
    Form,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{HeaderMap, header::ACCEPT, request::Parts},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use tracing::debug;

use crate::input::CalcForm;

/// Address recorded in the audit log for the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(ClientIp(client_ip(&parts.headers, peer)))
    }
}

/// First valid address from `X-Forwarded-For`, then `X-Real-IP`, then the
/// TCP peer. `"unknown"` when none is available.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header_ip = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok())
    };

    header_ip("x-forwarded-for")
        .or_else(|| header_ip("x-real-ip"))
        .or_else(|| peer.map(|addr| addr.ip()))
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// How a response body should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Json,
}

impl Format {
    /// JSON only when the client asks for it
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains("application/json"));

        if wants_json { Format::Json } else { Format::Html }
    }
}

impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Format::from_headers(&parts.headers))
    }
}

/// Operand fields of a POST body. Never rejects: a body that cannot be read
/// as a form yields empty fields, which then fail number parsing with a 400.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted(pub CalcForm);

impl<S> FromRequest<S> for Submitted
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => pairs,
            Err(rejection) => {
                debug!("Unreadable form body: {}", rejection.body_text());
                Vec::new()
            }
        };
        Ok(Submitted(CalcForm::from_pairs(pairs)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{self, HeaderValue, header::CONTENT_TYPE};

    fn post(path: &str, content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = http::Request::builder().method("POST").uri(path);
        if let Some(value) = content_type {
            builder = builder.header(CONTENT_TYPE, value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_forwarded_for_wins() {
        let map = headers(&[
            ("x-forwarded-for", "203.0.113.9, 10.0.0.1"),
            ("x-real-ip", "198.51.100.4"),
        ]);
        let peer: SocketAddr = "127.0.0.1:5000".parse().unwrap();
        assert_eq!(client_ip(&map, Some(peer)), "203.0.113.9");
    }

    #[test]
    fn test_real_ip_then_peer() {
        let map = headers(&[("x-real-ip", "198.51.100.4")]);
        assert_eq!(client_ip(&map, None), "198.51.100.4");

        let peer: SocketAddr = "[::1]:5000".parse().unwrap();
        assert_eq!(client_ip(&HeaderMap::new(), Some(peer)), "::1");
    }

    #[test]
    fn test_garbage_header_ignored() {
        let map = headers(&[("x-forwarded-for", "not-an-ip")]);
        assert_eq!(client_ip(&map, None), "unknown");
    }

    #[test]
    fn test_format_negotiation() {
        assert_eq!(Format::from_headers(&HeaderMap::new()), Format::Html);
        assert_eq!(
            Format::from_headers(&headers(&[("accept", "text/html,application/xhtml+xml")])),
            Format::Html
        );
        assert_eq!(
            Format::from_headers(&headers(&[("accept", "application/json")])),
            Format::Json
        );
    }

    const FORM: &str = "application/x-www-form-urlencoded";

    async fn submitted(request: Request) -> CalcForm {
        let Ok(Submitted(form)) = Submitted::from_request(request, &()).await;
        form
    }

    #[tokio::test]
    async fn test_submitted_reads_form() {
        let request = post("/add", Some(FORM), "number1=1.5&number2=-2");
        assert_eq!(submitted(request).await, CalcForm::new("1.5", "-2"));
    }

    #[tokio::test]
    async fn test_submitted_without_content_type_is_empty() {
        let request = post("/add", None, "");
        assert_eq!(submitted(request).await, CalcForm::default());
    }

    #[tokio::test]
    async fn test_submitted_duplicate_keeps_first() {
        let request = post("/multiply", Some(FORM), "number1=10&number1=3&number2=5");
        assert_eq!(submitted(request).await, CalcForm::new("10", "5"));
    }
}
