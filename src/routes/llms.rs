//! llms.txt routes
//!
//! Serves aggregated documentation text as Markdown.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::content::DOCS_BASE_URL;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Content type of every llms response
pub const MARKDOWN: &str = "text/markdown; charset=utf-8";

/// Create the llms router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/llms.txt", get(module_index))
        .route("/llms.txt/:module", get(module_text))
        .route("/llms.mdx/*path", get(folder_text))
        .route("/docs/*path", get(docs_mdx))
}

/// Markdown body with the configured caching policy
struct MarkdownResponse {
    body: String,
    cache_control: String,
}

impl MarkdownResponse {
    fn new(state: &AppState, body: String) -> Self {
        Self {
            body,
            cache_control: state.config().cache_control(),
        }
    }
}

impl IntoResponse for MarkdownResponse {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, MARKDOWN.to_string()),
                (header::CACHE_CONTROL, self.cache_control),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Index of modules, one link per module
async fn module_index(State(state): State<AppState>) -> MarkdownResponse {
    let mut body = String::from("# Index\n\nModules available as llms.txt:\n");
    for module in state.pages().modules() {
        body.push_str(&format!("\n- [{module}](/llms.txt/{module})"));
    }
    MarkdownResponse::new(&state, body)
}

/// Every page of one module; any render failure fails the request
async fn module_text(
    State(state): State<AppState>,
    Path(module): Path<String>,
) -> Result<MarkdownResponse> {
    let text = state.aggregator().aggregate_module(&module).await?;
    Ok(MarkdownResponse::new(&state, text))
}

/// Every page under a folder; broken pages are left out
async fn folder_text(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<MarkdownResponse> {
    folder_response(&state, &path).await
}

/// `/docs/<path>.mdx` is served as `/llms.mdx/<path>`
async fn docs_mdx(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<MarkdownResponse> {
    let folder = path
        .strip_suffix(".mdx")
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", DOCS_BASE_URL, path)))?;
    folder_response(&state, folder).await
}

async fn folder_response(state: &AppState, path: &str) -> Result<MarkdownResponse> {
    let folder = path.trim_start_matches('/');
    let text = state.aggregator().aggregate_folder(folder).await?;
    Ok(MarkdownResponse::new(state, text))
}
