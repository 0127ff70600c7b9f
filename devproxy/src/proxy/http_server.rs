use crate::config::RouteConfig;
use crate::proxy::request_handler::{ProxyContext, handle_request};
use anyhow::{Result, bail};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, StatusCode};
use log::{error, info};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run one proxy instance on `0.0.0.0:<listen port>` until the server fails.
pub async fn start_rp_server(route: RouteConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], route.get_listen_port()));
    let context = Arc::new(ProxyContext::new(route));

    let make_svc = make_service_fn(move |conn: &AddrStream| {
        let remote_addr = conn.remote_addr().ip();
        let context = context.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let client_ip = remote_addr;
                let context = context.clone();
                async move {
                    match handle_request(&context, client_ip, req).await {
                        Ok(resp) => Ok::<_, Infallible>(resp),
                        Err(e) => {
                            error!("handle_request error from {}: {}", client_ip, e);
                            let mut resp = Response::new(Body::empty());
                            *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                            Ok::<_, Infallible>(resp)
                        }
                    }
                }
            }))
        }
    });

    let builder = match hyper::Server::try_bind(&addr) {
        Ok(b) => b,
        Err(e) => bail!("Failed to bind proxy on {}: {}", addr, e),
    };
    let server = builder.serve(make_svc);

    info!("Proxy listening on {}", addr);
    server.await?;
    Ok(())
}

/// Run every instance concurrently. An instance that fails is logged and the rest keep running;
/// this only returns an error once none are left.
pub async fn start_all(routes: Vec<RouteConfig>) -> Result<()> {
    let mut servers = JoinSet::new();
    for route in routes {
        let port = route.get_listen_port();
        servers.spawn(async move { (port, start_rp_server(route).await) });
    }

    let total = servers.len();
    let mut failed = 0;
    while let Some(joined) = servers.join_next().await {
        match joined {
            Ok((port, Err(e))) => {
                error!("Proxy on port {} stopped: {}", port, e);
                failed += 1;
            }
            Ok((port, Ok(()))) => info!("Proxy on port {} shut down", port),
            Err(e) => {
                error!("Proxy task failed: {}", e);
                failed += 1;
            }
        }
    }

    if failed == total {
        bail!("No proxy instance could be started");
    }
    Ok(())
}
