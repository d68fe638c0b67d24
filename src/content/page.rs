//! Documentation page model

use std::path::{Component, Path, PathBuf};

use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use super::frontmatter::Frontmatter;

/// URL prefix every page lives under
pub const DOCS_BASE_URL: &str = "/docs";

/// One addressable unit of documentation
#[derive(Debug, Clone)]
pub struct Page {
    /// Logical path, e.g. `/docs/auth/setup`
    pub url: String,
    /// Path segments below the base URL
    pub slugs: Vec<String>,
    pub title: String,
    pub description: Option<String>,
    /// Markdown body with frontmatter removed
    pub body: String,
    /// File the page was loaded from, if any
    pub source_path: Option<PathBuf>,
}

impl Page {
    /// Build a page that has no backing file
    pub fn new(url: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let url = url.into();
        let slugs = url
            .strip_prefix(DOCS_BASE_URL)
            .unwrap_or(&url)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            url,
            slugs,
            title: title.into(),
            description: None,
            body: body.into(),
            source_path: None,
        }
    }

    /// Build a page from a file below the content root
    pub fn from_file(
        relative: &Path,
        source_path: PathBuf,
        frontmatter: Frontmatter,
        body: &str,
    ) -> Self {
        let slugs = slugs_for(relative);
        let url = url_for(&slugs);
        let title = frontmatter
            .title
            .or_else(|| first_heading(body))
            .or_else(|| {
                relative
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            })
            .unwrap_or_else(|| "Untitled".to_string());

        Self {
            url,
            slugs,
            title,
            description: frontmatter.description,
            body: body.to_string(),
            source_path: Some(source_path),
        }
    }

    /// Module this page belongs to (first slug, i.e. the second URL segment)
    pub fn module(&self) -> Option<&str> {
        self.slugs.first().map(String::as_str)
    }
}

/// Slugs for a content-relative file path: extension removed, trailing
/// `index` dropped.
pub fn slugs_for(relative: &Path) -> Vec<String> {
    let mut slugs: Vec<String> = relative
        .with_extension("")
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();

    if slugs.last().map(|s| s == "index").unwrap_or(false) {
        slugs.pop();
    }
    slugs
}

/// URL for a list of slugs
pub fn url_for(slugs: &[String]) -> String {
    let mut url = DOCS_BASE_URL.to_string();
    for slug in slugs {
        url.push('/');
        url.push_str(slug);
    }
    url
}

/// Text of the first heading in a Markdown body
fn first_heading(body: &str) -> Option<String> {
    let mut in_heading = false;
    let mut text = String::new();

    for event in Parser::new(body) {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                let title = text.trim();
                return (!title.is_empty()).then(|| title.to_string());
            }
            Event::Text(t) | Event::Code(t) if in_heading => text.push_str(&t),
            _ => {}
        }
    }
    None
}
