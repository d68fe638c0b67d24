//! Documentation content
//!
//! Loading of the Markdown/MDX tree into memory and rendering of single
//! pages to plain text.
//!
//! # Architecture
//!
//! ```text
//!   content/docs/**/*.mdx
//!            │
//!            ▼
//!   ┌──────────────┐      ┌────────────────┐
//!   │  DocsLoader  │ ───▶ │  StaticSource  │  (PageSource)
//!   └──────────────┘      └────────────────┘
//!                                 │ Page
//!                                 ▼
//!                        ┌────────────────┐
//!                        │ MdxTextRenderer│  (PageRenderer)
//!                        └────────────────┘
//! ```

mod error;
pub mod frontmatter;
mod loader;
mod page;
mod render;
mod source;

pub use error::{ContentError, RenderError, RenderResult, Result};
pub use frontmatter::Frontmatter;
pub use loader::DocsLoader;
pub use page::{Page, DOCS_BASE_URL};
pub use render::{MdxTextRenderer, PageRenderer};
pub use source::{PageSource, StaticSource};
