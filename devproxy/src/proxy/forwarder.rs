use crate::config::ServerAddress;
use crate::proxy::headers::{forwardable_request_headers, rewrite_response_headers};
use anyhow::Result;
use hyper::client::HttpConnector;
use hyper::{Body, Client, Request, Response, StatusCode, Uri};
use hyper_tls::HttpsConnector;
use log::{debug, error, info};
use std::time::Instant;

/// Client used for every upstream, plain HTTP and HTTPS alike.
pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

pub fn create_http_client() -> HttpClient {
    let https = HttpsConnector::new();
    Client::builder().build::<_, Body>(https)
}

/// Upstream URI for a request: the target's origin and path prefix followed by the untouched
/// path and query of the inbound request.
pub fn outbound_uri(target: &ServerAddress, path_and_query: &str) -> Result<Uri> {
    Ok(format!("{}{}", target, path_and_query).parse::<Uri>()?)
}

/// Relay `req` to `target` and hand back the upstream response.
///
/// Both bodies are passed through as streams, never collected. When the upstream cannot be reached
/// the client gets an empty `502 Bad Gateway`; the request is not retried.
pub async fn forward(client: &HttpClient, target: &ServerAddress, req: Request<Body>) -> Result<Response<Body>> {
    let (parts, body) = req.into_parts();
    let path_and_query = parts.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let uri = outbound_uri(target, path_and_query)?;

    let mut upstream_req = Request::builder().method(parts.method.clone()).uri(uri.clone()).body(body)?;
    *upstream_req.headers_mut() = forwardable_request_headers(&parts.headers);

    debug!("Upstream request: {} {}", parts.method, uri);
    let start = Instant::now();
    match client.request(upstream_req).await {
        Ok(upstream_res) => {
            info!("{}{}", target, path_and_query);
            debug!("{} responded {} in {} ms", uri, upstream_res.status(), start.elapsed().as_millis());
            let (mut res_parts, res_body) = upstream_res.into_parts();
            rewrite_response_headers(&mut res_parts.headers);
            Ok(Response::from_parts(res_parts, res_body))
        }
        Err(e) => {
            error!("Upstream request {} {} failed after {} ms: {}", parts.method, uri, start.elapsed().as_millis(), e);
            Ok(Response::builder().status(StatusCode::BAD_GATEWAY).body(Body::empty())?)
        }
    }
}
