//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The portal has no API of its own: every account operation goes from the
//! browser straight to the hosted platform. This router only renders the
//! Leptos app (SSR + hydration), serves the compiled `/pkg` assets, and
//! answers `/healthz`.


use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use platform::PlatformConfig;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Routes that do not depend on the Leptos build output.
fn base_routes() -> Router {
    Router::new().route("/healthz", get(healthz))
}

/// Leptos SSR app plus static assets.
///
/// `platform` is embedded in every rendered page for the hydrated client.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn leptos_app(platform: Option<PlatformConfig>) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone(), platform.clone())
        })
        .with_state(leptos_options.clone());

    // Serve Leptos static assets (WASM, CSS, JS) from the site root /pkg directory.
    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(base_routes()
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback_service(ServeDir::new(site_root_path))
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
