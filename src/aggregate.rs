//! Documentation aggregation
//!
//! Selects the pages under a module, renders each one and joins the results
//! into a single text artifact. Two public variants exist:
//!
//! - [`Aggregator::aggregate_module`]: matches `/docs/<id>` and
//!   `/docs/<id>/...`, fails the whole call on any render error.
//! - [`Aggregator::aggregate_folder`]: matches any URL starting with
//!   `/docs/<id>` (so `auth` also matches `auth2`), skips pages that fail to
//!   render, and wraps the result in a title/URL header.
//!
//! The folder variant's loose prefix match is pinned by a test. Tighten it
//! only together with the `/docs/*.mdx` links that depend on it.

use std::sync::Arc;

use futures::future::join_all;

use crate::content::{Page, PageRenderer, PageSource, RenderResult, DOCS_BASE_URL};

/// Separator between rendered pages
pub const PAGE_SEPARATOR: &str = "\n\n";

/// How a page URL is matched against the module prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixMatch {
    /// URL equals the prefix or continues it with `/`
    Segment,
    /// URL starts with the prefix, no boundary check
    Raw,
}

impl PrefixMatch {
    pub fn matches(self, url: &str, prefix: &str) -> bool {
        match self {
            PrefixMatch::Segment => {
                url == prefix
                    || url
                        .strip_prefix(prefix)
                        .map(|rest| rest.starts_with('/'))
                        .unwrap_or(false)
            }
            PrefixMatch::Raw => url.starts_with(prefix),
        }
    }
}

/// What to do when a single page fails to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnPageError {
    /// Fail the whole aggregation
    Propagate,
    /// Log the failure and leave the page out
    Skip,
}

/// Aggregates rendered page text for a module
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn PageSource>,
    renderer: Arc<dyn PageRenderer>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn PageSource>, renderer: Arc<dyn PageRenderer>) -> Self {
        Self { source, renderer }
    }

    /// Underlying page collection
    pub fn source(&self) -> &dyn PageSource {
        self.source.as_ref()
    }

    /// Concatenated text of every page in module `id`.
    ///
    /// Returns an empty string when nothing matches.
    pub async fn aggregate_module(&self, id: &str) -> RenderResult<String> {
        self.aggregate(id, PrefixMatch::Segment, OnPageError::Propagate)
            .await
    }

    /// Header plus the concatenated text of every page whose URL starts
    /// with `/docs/<id>`. Pages that fail to render are omitted.
    pub async fn aggregate_folder(&self, id: &str) -> RenderResult<String> {
        let body = self.aggregate(id, PrefixMatch::Raw, OnPageError::Skip).await?;
        Ok(format!("# {id}\nURL: {DOCS_BASE_URL}/{id}\n\n{body}"))
    }

    /// Select, order, render and join the pages under `id`
    pub async fn aggregate(
        &self,
        id: &str,
        prefix_match: PrefixMatch,
        on_error: OnPageError,
    ) -> RenderResult<String> {
        let prefix = format!("{}/{}", DOCS_BASE_URL, id);
        let selected = self.select(&prefix, prefix_match);
        tracing::debug!("Aggregating {} pages under {}", selected.len(), prefix);

        let rendered = join_all(
            selected
                .iter()
                .map(|page| self.renderer.render_text(page)),
        )
        .await;

        let mut texts = Vec::with_capacity(rendered.len());
        for (page, result) in selected.iter().zip(rendered) {
            match (result, on_error) {
                (Ok(text), _) => texts.push(text),
                (Err(e), OnPageError::Propagate) => return Err(e),
                (Err(e), OnPageError::Skip) => {
                    tracing::error!("Error processing {}: {}", page.url, e);
                }
            }
        }

        Ok(texts.join(PAGE_SEPARATOR))
    }

    /// Matching pages sorted by URL (plain byte order)
    fn select(&self, prefix: &str, prefix_match: PrefixMatch) -> Vec<&Page> {
        let mut pages: Vec<&Page> = self
            .source
            .pages()
            .iter()
            .filter(|page| prefix_match.matches(&page.url, prefix))
            .collect();
        pages.sort_by(|a, b| a.url.cmp(&b.url));
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RenderError, StaticSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Renders a page as its body; bodies starting with `!` fail
    #[derive(Default)]
    struct FixtureRenderer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PageRenderer for FixtureRenderer {
        async fn render_text(&self, page: &Page) -> RenderResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if page.body.starts_with('!') {
                return Err(RenderError::malformed(&page.url, "fixture failure"));
            }
            Ok(page.body.clone())
        }
    }

    fn aggregator(pages: &[(&str, &str)]) -> (Aggregator, Arc<FixtureRenderer>) {
        let source = StaticSource::new(
            pages
                .iter()
                .map(|(url, body)| Page::new(*url, "", *body))
                .collect(),
        );
        let renderer = Arc::new(FixtureRenderer::default());
        (Aggregator::new(Arc::new(source), renderer.clone()), renderer)
    }

    #[tokio::test]
    async fn test_module_joins_in_order() {
        let (agg, _) = aggregator(&[("/docs/x/b", "B"), ("/docs/x/a", "A")]);
        assert_eq!(agg.aggregate_module("x").await.unwrap(), "A\n\nB");
    }

    #[tokio::test]
    async fn test_module_order_is_bytewise() {
        let (agg, _) = aggregator(&[
            ("/docs/x/b", "b"),
            ("/docs/x/B", "B"),
            ("/docs/x/a10", "a10"),
            ("/docs/x/a2", "a2"),
            ("/docs/x", "root"),
        ]);
        assert_eq!(
            agg.aggregate_module("x").await.unwrap(),
            "root\n\nB\n\na10\n\na2\n\nb"
        );
    }

    #[tokio::test]
    async fn test_module_without_pages_is_empty() {
        let (agg, renderer) = aggregator(&[("/docs/x/a", "A")]);
        assert_eq!(agg.aggregate_module("missing").await.unwrap(), "");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_folder_always_has_header() {
        let (agg, _) = aggregator(&[]);
        assert_eq!(
            agg.aggregate_folder("missing").await.unwrap(),
            "# missing\nURL: /docs/missing\n\n"
        );
    }

    #[tokio::test]
    async fn test_render_failure_policies() {
        let (agg, renderer) = aggregator(&[
            ("/docs/x/a", "A"),
            ("/docs/x/b", "!broken"),
            ("/docs/x/c", "C"),
        ]);

        let result = agg.aggregate_module("x").await;
        assert!(matches!(result, Err(RenderError::Malformed { .. })));
        // Every selected page is rendered once even when one fails
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 3);

        assert_eq!(
            agg.aggregate_folder("x").await.unwrap(),
            "# x\nURL: /docs/x\n\nA\n\nC"
        );
    }

    #[tokio::test]
    async fn test_prefix_boundary() {
        let (agg, _) = aggregator(&[("/docs/auth", "auth"), ("/docs/auth2/page", "auth2")]);

        assert_eq!(agg.aggregate_module("auth").await.unwrap(), "auth");
        // Folder matching has no segment boundary and picks up auth2 too
        assert_eq!(
            agg.aggregate_folder("auth").await.unwrap(),
            "# auth\nURL: /docs/auth\n\nauth\n\nauth2"
        );
    }

    #[tokio::test]
    async fn test_nested_folder() {
        let (agg, _) = aggregator(&[
            ("/docs/x/guide/one", "1"),
            ("/docs/x/guide/two", "2"),
            ("/docs/x/other", "o"),
        ]);
        assert_eq!(
            agg.aggregate_folder("x/guide").await.unwrap(),
            "# x/guide\nURL: /docs/x/guide\n\n1\n\n2"
        );
    }

    #[tokio::test]
    async fn test_idempotent() {
        let (agg, _) = aggregator(&[("/docs/x/a", "A"), ("/docs/x/b", "!b")]);
        assert_eq!(
            agg.aggregate_folder("x").await.unwrap(),
            agg.aggregate_folder("x").await.unwrap()
        );
        let (agg, _) = aggregator(&[("/docs/x/a", "A"), ("/docs/x/b", "B")]);
        assert_eq!(
            agg.aggregate_module("x").await.unwrap(),
            agg.aggregate_module("x").await.unwrap()
        );
    }

    #[test]
    fn test_prefix_match() {
        assert!(PrefixMatch::Segment.matches("/docs/a", "/docs/a"));
        assert!(PrefixMatch::Segment.matches("/docs/a/b", "/docs/a"));
        assert!(!PrefixMatch::Segment.matches("/docs/ab", "/docs/a"));
        assert!(PrefixMatch::Raw.matches("/docs/ab", "/docs/a"));
        assert!(!PrefixMatch::Raw.matches("/docs", "/docs/a"));
    }
}
