//! Local preview server.
//!
//! Static files come straight from the output directory. Requests that match
//! nothing get the built not-found page with a real `404` status instead of
//! the file server's empty response.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower_http::services::ServeDir;

use crate::{
    ServeArgs,
    build::base_path_from_config,
    commands::build::build_site,
    config::Config,
};

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error(
        "not-found page {0} does not exist. Create a 404 template, e.g. `src/404.md` \
         with `permalink: 404.html` in its front matter, and rebuild"
    )]
    MissingNotFoundPage(PathBuf),
}

pub async fn run(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let config_path = Config::path_from_arg(args.config_file.as_deref())?;
    let config = Config::load(&config_path)?;
    let base_path = base_path_from_config(&config_path);

    let bind = args.bind.clone().unwrap_or_else(|| config.dev.bind.clone());
    let port = args.port.unwrap_or(config.dev.port);

    // Build the site first
    tracing::info!("building site...");
    let result = build_site(config, &base_path).await?;
    tracing::info!(
        "built {} documents, {} passthrough files",
        result.documents,
        result.passthrough_files
    );

    let not_found_page = result
        .not_found_page
        .clone()
        .unwrap_or_else(|| result.output_dir.join("404.html"));
    let app = router(&result.output_dir, &not_found_page)?;

    // Parse the address
    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;

    // Determine the URL to display
    let display_host = if bind == "0.0.0.0" { "localhost" } else { &bind };
    let url = format!("http://{}:{}", display_host, port);

    println!("\nServing site at {}", url);
    println!("Press Ctrl+C to stop\n");

    // Open browser if requested
    if args.open
        && let Err(e) = open::that(&url)
    {
        tracing::warn!("failed to open browser: {}", e);
    }

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve `output_dir`, answering unmatched requests with `not_found_page`.
///
/// Fails if the not-found page has not been built, so a site without one
/// never starts serving.
pub fn router(output_dir: &Path, not_found_page: &Path) -> Result<Router, ServeError> {
    if !not_found_page.is_file() {
        return Err(ServeError::MissingNotFoundPage(not_found_page.to_path_buf()));
    }

    let page = Arc::new(not_found_page.to_path_buf());
    let not_found = move || {
        let page = Arc::clone(&page);
        async move { not_found_response(&page).await }
    };

    let serve_dir = ServeDir::new(output_dir)
        .append_index_html_on_directories(true)
        .fallback(not_found.into_service());

    Ok(Router::new().fallback_service(serve_dir))
}

/// Read the not-found page fresh for every request, so a rebuild shows up
/// without restarting the server.
async fn not_found_response(page: &Path) -> Response {
    match tokio::fs::read(page).await {
        Ok(body) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=UTF-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to read not-found page {}: {}", page.display(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "not-found page is missing, rebuild the site",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    const NOT_FOUND_HTML: &[u8] = b"<!doctype html><h1>Nothing here</h1>\n";

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
        std::fs::create_dir_all(dir.path().join("posts/hello")).unwrap();
        std::fs::write(dir.path().join("posts/hello/index.html"), "<h1>Hello</h1>").unwrap();
        std::fs::write(dir.path().join("404.html"), NOT_FOUND_HTML).unwrap();
        dir
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body.to_vec())
    }

    #[test]
    fn test_missing_not_found_page_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        let err = router(dir.path(), &dir.path().join("404.html")).unwrap_err();
        assert!(matches!(err, ServeError::MissingNotFoundPage(_)));
        assert!(err.to_string().contains("src/404.md"));
    }

    #[tokio::test]
    async fn test_existing_files_are_served() {
        let dir = site();
        let app = router(dir.path(), &dir.path().join("404.html")).unwrap();

        let (status, _, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>Home</h1>");

        let (status, _, body) = get(app, "/posts/hello/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>Hello</h1>");
    }

    #[tokio::test]
    async fn test_unknown_paths_get_not_found_page() {
        let dir = site();
        let app = router(dir.path(), &dir.path().join("404.html")).unwrap();

        for uri in ["/nope", "/posts/missing/", "/assets/missing.png"] {
            let (status, content_type, body) = get(app.clone(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(content_type.as_deref(), Some("text/html; charset=UTF-8"));
            assert_eq!(body, NOT_FOUND_HTML);
        }
    }

    #[tokio::test]
    async fn test_not_found_page_is_reread_per_request() {
        let dir = site();
        let page = dir.path().join("404.html");
        let app = router(dir.path(), &page).unwrap();

        std::fs::write(&page, "<h1>Rebuilt</h1>").unwrap();
        let (status, _, body) = get(app.clone(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, b"<h1>Rebuilt</h1>");

        std::fs::remove_file(&page).unwrap();
        let (status, _, _) = get(app, "/nope").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
