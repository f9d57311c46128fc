//! Development server.
//!
//! Every request regenerates its document from the current content, so edits
//! show up on reload without a watcher. Processed images are written into
//! the output directory and served from there.

mod lifecycle;
mod response;
mod routes;

use crate::{
    config::SiteConfig,
    core::{is_shutdown, register_server},
    generator::{
        RequestContext, feed::render_feed, robots::render_robots, sitemap::render_sitemaps,
    },
    image::{ImageProcessor, ImageTransformer},
    log,
    utils::mime::types::{PLAIN, RSS, XML},
};
use anyhow::{Context, Result};
use routes::Route;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};
use url::Url;

use super::common::load_collection;

/// Bind and answer requests until Ctrl+C.
pub fn serve_site(config: Arc<SiteConfig>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    let config = Arc::new(Arc::unwrap_or_clone(config).with_local_url(addr));
    let site = config.base_url()?;
    log!("serve"; "http://{}{}", addr, site.path());

    run_request_loop(&server, &config, addr)
}

fn run_request_loop(server: &Server, config: &Arc<SiteConfig>, addr: SocketAddr) -> Result<()> {
    // Image processing can be slow; keep it off the accept loop
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, addr) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig, addr: SocketAddr) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let site = match config.base_url() {
        Ok(site) => site,
        Err(e) => return response::respond_error(request, &e),
    };
    let route = routes::route(request.url(), site.path(), config);
    crate::debug!("serve"; "{} {} -> {:?}", request.method(), request.url(), route);

    let rendered = match &route {
        Route::Feed => request_url(&request, addr)
            .and_then(|url| render_feed_for(config, RequestContext::new(site, url)))
            .map(|xml| (RSS, xml)),
        Route::Robots => render_robots(config).map(|text| (PLAIN, text)),
        Route::SitemapIndex | Route::SitemapUrlset => {
            let index = route == Route::SitemapIndex;
            load_collection(config)
                .and_then(|collection| render_sitemaps(config, &collection.entries))
                .map(|maps| (XML, if index { maps.index } else { maps.urlset }))
        }
        Route::Asset(path) => return response::respond_file(request, path),
        Route::NotFound => return response::respond_not_found(request),
    };

    match rendered {
        Ok((mime, body)) => response::respond_document(request, mime, body),
        Err(e) => {
            log!("error"; "{}: {e:#}", request.url());
            response::respond_error(request, &e)
        }
    }
}

fn render_feed_for(config: &SiteConfig, ctx: RequestContext) -> Result<String> {
    let collection = load_collection(config)?;
    let processor = ImageProcessor::from_config(config)?;
    render_feed(
        config,
        &collection.entries,
        &ctx,
        Some(&processor as &dyn ImageTransformer),
        None,
    )
}

/// Absolute URL of the request, from its `Host` header or the bound address.
fn request_url(request: &Request, addr: SocketAddr) -> Result<Url> {
    let host = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Host"))
        .map(|h| h.value.to_string())
        .unwrap_or_else(|| addr.to_string());
    absolute_url(&host, request.url())
}

fn absolute_url(host: &str, path: &str) -> Result<Url> {
    let raw = format!("http://{host}{path}");
    Url::parse(&raw).with_context(|| format!("invalid request URL '{raw}'"))
}
