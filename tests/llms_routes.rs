use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum_test::TestServer;
use tempfile::TempDir;
use tower::ServiceExt;

use llms_docs_server::config::Config;
use llms_docs_server::content::{DocsLoader, MdxTextRenderer};
use llms_docs_server::routes;
use llms_docs_server::state::AppState;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn docs_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "index.mdx", "---\ntitle: Home\n---\nWelcome");
    write(root, "auth/index.mdx", "---\ntitle: Auth\n---\nAuth overview");
    write(
        root,
        "auth/setup.mdx",
        "---\ntitle: Setup\ndescription: Configure auth\n---\nimport { Steps } from \"fumadocs-ui/components/steps\";\n\n<Steps>\nSetup steps\n</Steps>\n",
    );
    write(root, "auth2/page.mdx", "---\ntitle: Other\n---\nOther module");
    write(root, "broken/good.mdx", "---\ntitle: Good\n---\nFine");
    write(root, "broken/bad.mdx", "---\ntitle: Bad\n---\n<Steps>\nnever closed\n");
    temp_dir
}

fn app(root: &Path) -> axum::Router {
    let source = DocsLoader::new(root).load().unwrap();
    let state = AppState::new(
        Config::default(),
        Arc::new(source),
        Arc::new(MdxTextRenderer::new()),
    );
    routes::app(state)
}

#[tokio::test]
async fn test_module_text() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let response = server.get("/llms.txt/auth").await;
    response.assert_status_ok();
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        "text/markdown; charset=utf-8"
    );
    assert_eq!(
        response.header(header::CACHE_CONTROL),
        "public, max-age=31536000, immutable"
    );
    assert_eq!(
        response.text(),
        "# Auth\nURL: /docs/auth\n\nAuth overview\n\n\
         # Setup\nURL: /docs/auth/setup\n\nConfigure auth\n\n<Steps>\nSetup steps\n</Steps>"
    );
}

#[tokio::test]
async fn test_unknown_module_is_empty() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let response = server.get("/llms.txt/nothing-here").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn test_module_render_failure_is_server_error() {
    let docs = docs_tree();
    let response = app(docs.path())
        .oneshot(
            Request::builder()
                .uri("/llms.txt/broken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_folder_skips_broken_pages() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let response = server.get("/llms.mdx/broken").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "# broken\nURL: /docs/broken\n\n# Good\nURL: /docs/broken/good\n\nFine"
    );
}

#[tokio::test]
async fn test_folder_prefix_includes_sibling_module() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let text = server.get("/llms.mdx/auth").await.text();
    assert!(text.starts_with("# auth\nURL: /docs/auth\n\n# Auth\n"));
    assert!(text.contains("URL: /docs/auth2/page"));

    let text = server.get("/llms.txt/auth").await.text();
    assert!(!text.contains("/docs/auth2"));
}

#[tokio::test]
async fn test_docs_mdx_rewrite() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let rewritten = server.get("/docs/auth/setup.mdx").await;
    rewritten.assert_status_ok();
    assert_eq!(
        rewritten.text(),
        server.get("/llms.mdx/auth/setup").await.text()
    );
    assert!(rewritten.text().starts_with("# auth/setup\nURL: /docs/auth/setup\n\n# Setup"));

    server
        .get("/docs/auth/setup")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_module_index() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let response = server.get("/llms.txt").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "# Index\n\nModules available as llms.txt:\n\n\
         - [auth](/llms.txt/auth)\n\
         - [auth2](/llms.txt/auth2)\n\
         - [broken](/llms.txt/broken)"
    );
}

#[tokio::test]
async fn test_health() {
    let docs = docs_tree();
    let server = TestServer::new(app(docs.path())).unwrap();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["pages"], 6);
}
