//! Content directory loader
//!
//! Walks the docs directory once at startup and builds the page collection.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::frontmatter;
use super::page::Page;
use super::source::StaticSource;

/// Loader for a Markdown/MDX documentation tree
pub struct DocsLoader {
    root: PathBuf,
}

impl DocsLoader {
    /// Create a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load every page below the root.
    ///
    /// Fails only when the root itself cannot be read. Bad files are logged
    /// and skipped.
    pub fn load(&self) -> Result<StaticSource> {
        tracing::info!("Loading docs from {}", self.root.display());
        let start = std::time::Instant::now();

        std::fs::read_dir(&self.root).map_err(|source| ContentError::DirUnreadable {
            path: self.root.clone(),
            source,
        })?;

        let mut pages = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_doc_file(entry.path()) {
                continue;
            }

            match self.load_page(entry.path()) {
                Ok(page) => {
                    if !seen.insert(page.url.clone()) {
                        tracing::warn!(
                            "Duplicate page URL {} from {}, skipping",
                            page.url,
                            entry.path().display()
                        );
                        continue;
                    }
                    tracing::debug!("Loaded page {}", page.url);
                    pages.push(page);
                }
                Err(e) => {
                    tracing::warn!("Error loading {}: {}", entry.path().display(), e);
                }
            }
        }

        tracing::info!(
            "Docs load complete: {} pages in {:?}",
            pages.len(),
            start.elapsed()
        );

        Ok(StaticSource::new(pages))
    }

    fn load_page(&self, path: &Path) -> Result<Page> {
        let content = std::fs::read_to_string(path)?;
        let (frontmatter, body) = frontmatter::split(&content)
            .map_err(|_| ContentError::UnterminatedFrontmatter(path.to_path_buf()))?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        Ok(Page::from_file(relative, path.to_path_buf(), frontmatter, body))
    }
}

/// `_partials` and dotfiles hold include targets and tooling, not pages
fn is_hidden(name: &OsStr) -> bool {
    name.to_str()
        .map(|n| n.starts_with('_') || n.starts_with('.'))
        .unwrap_or(false)
}

fn is_doc_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "md" || ext == "mdx")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PageSource;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "index.mdx", "---\ntitle: Home\n---\nWelcome");
        write(root, "auth/index.mdx", "---\ntitle: Auth\n---\nAuth overview");
        write(root, "auth/setup.md", "# Setup\n\nSteps");
        write(root, "auth/meta.json", "{}");
        write(root, "auth/diagram.png", "");
        write(root, "auth/_partials/note.md", "included only");

        let source = DocsLoader::new(root).load().unwrap();
        let urls: Vec<&str> = source.pages().iter().map(|p| p.url.as_str()).collect();

        assert_eq!(urls, vec!["/docs/auth", "/docs/auth/setup", "/docs"]);
        assert_eq!(source.pages()[1].title, "Setup");
        assert_eq!(source.modules(), vec!["auth"]);
    }

    #[test]
    fn test_bad_files_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "x/broken.mdx", "---\ntitle: never closed\n");
        write(root, "x/a.mdx", "second");
        write(root, "x/a.md", "first");

        // a.md sorts before a.mdx, so it owns /docs/x/a
        let source = DocsLoader::new(root).load().unwrap();
        assert_eq!(source.len(), 1);
        assert_eq!(source.pages()[0].body, "first");
    }

    #[test]
    fn test_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = DocsLoader::new(temp_dir.path().join("nope")).load();
        assert!(matches!(result, Err(ContentError::DirUnreadable { .. })));
    }
}
