//! llms-docs-server library
//!
//! The server binary is in main.rs; everything it wires together lives here
//! so integration tests can build the same router.
//!
//! # Modules
//!
//! - `content`: page loading, frontmatter, page-to-text rendering
//! - `aggregate`: module/folder aggregation over a page collection
//! - `routes`: HTTP endpoints

pub mod aggregate;
pub mod config;
pub mod content;
pub mod error;
pub mod routes;
pub mod state;
