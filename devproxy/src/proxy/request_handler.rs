use crate::config::RouteConfig;
use crate::proxy::forwarder::{HttpClient, create_http_client, forward};
use crate::proxy::router::{Dispatch, dispatch};
use crate::proxy::static_files::{self, StaticLookup};
use anyhow::Result;
use hyper::{Body, Request, Response};
use log::{info, trace, warn};
use std::net::IpAddr;

/// Everything a listener needs to answer requests: its route and an upstream client.
pub struct ProxyContext {
    route: RouteConfig,
    client: HttpClient,
}

impl ProxyContext {
    pub fn new(route: RouteConfig) -> Self {
        Self { route, client: create_http_client() }
    }

    pub fn get_route(&self) -> &RouteConfig {
        &self.route
    }
}

/// Handle one inbound request for the given proxy instance.
pub async fn handle_request(context: &ProxyContext, client_ip: IpAddr, req: Request<Body>) -> Result<Response<Body>> {
    let route = &context.route;
    let url = req.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/").to_string();
    trace!("{} {} {}", client_ip, req.method(), url);

    match dispatch(route, req.method(), &url) {
        Dispatch::Forward(target) => forward(&context.client, target, req).await,
        Dispatch::Static(local) => match static_files::resolve(&url, local).await {
            StaticLookup::Serve(file) => match static_files::serve(&file).await {
                Ok(response) => {
                    info!("static: {}", url);
                    Ok(response)
                }
                Err(e) => {
                    warn!("Unable to open {}: {}", file.path.display(), e);
                    forward(&context.client, route.get_remote(), req).await
                }
            },
            StaticLookup::NotFound => forward(&context.client, route.get_remote(), req).await,
        },
    }
}
