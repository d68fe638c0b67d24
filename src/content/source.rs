//! Page collections
//!
//! The aggregator only needs to list pages; how they got into memory is the
//! loader's business.

use std::collections::BTreeSet;

use super::page::Page;

/// Read-only access to the loaded page collection
pub trait PageSource: Send + Sync {
    /// All pages, in load order
    fn pages(&self) -> &[Page];

    /// Distinct module names, sorted
    fn modules(&self) -> Vec<String> {
        self.pages()
            .iter()
            .filter_map(Page::module)
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Fixed in-memory page collection
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: Vec<Page>,
}

impl StaticSource {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageSource for StaticSource {
    fn pages(&self) -> &[Page] {
        &self.pages
    }
}
