#![recursion_limit = "256"]

mod config;
mod routes;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt::init();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let port = config::port_from(std::env::var("PORT").ok().as_deref()).expect("invalid PORT");

    // Without platform config the pages still render; sign-in reports unavailable.
    let platform = config::platform_from_env();

    let app = routes::leptos_app(platform).expect("leptos configuration failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "tripkolic portal listening");
    axum::serve(listener, app).await.expect("server failed");
}
