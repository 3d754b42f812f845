//! Core library for devcards
//!
//! This crate implements the **Functional Core** of the devcards application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The devcards project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`devcards_core`** (this crate): Pure transformation functions with zero I/O
//! - **`devcards`**: HTTP fetching, cache stores, CLI and server (the Imperative Shell)
//!
//! Both rendering paths of the shell, the cached block render and the
//! asynchronous preview, go through the same functions in this crate, so a
//! field rendered by one path is rendered by the other.
//!
//! # Module Organization
//!
//! - [`article`]: Article model, payload decoding, date formatting, demo dataset
//! - [`config`]: Render configuration with lenient normalization
//! - [`sanitize`]: Escaping for text, attribute, URL and rich-text contexts
//! - [`render`]: Card, grid and notice markup
//! - [`feed`]: Feed outcomes, fallback resolution and cache entry freshness
//! - [`preview`]: Preview state machine and its markup
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use devcards_core::article::decode_articles;
//! use devcards_core::config::RenderConfig;
//! use devcards_core::render::render_grid;
//!
//! // Decode fixture data (no HTTP required)
//! let articles = decode_articles(r#"[{"id": 1, "title": "Hello"}]"#)?;
//!
//! // Normalize loosely-typed block attributes
//! let config = RenderConfig::from_attributes(&serde_json::json!({ "columns": 5 }));
//!
//! let html = render_grid(&articles, &config);
//! assert!(html.contains("data-columns=\"3\""));
//! ```

pub mod article;
pub mod config;
pub mod feed;
pub mod preview;
pub mod render;
pub mod sanitize;
