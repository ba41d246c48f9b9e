//! # cardtex
//!
//! Convert embedded LaTeX markup inside flashcard text into rendered image
//! references, caching the rendered PNGs on disk keyed by content hash.
//!
//! ## Why this crate?
//!
//! Flashcard text is HTML-flavoured, but formulas want real typesetting.
//! Rendering in the browser on every review is wasteful and needs a JS math
//! stack; rendering once with the TeX toolchain and caching the PNG next to
//! the card's other media is cheap, deterministic, and works offline. The
//! filename is a pure function of the formula content, so the media
//! directory *is* the cache — no index, no invalidation logic.
//!
//! ## Pipeline Overview
//!
//! ```text
//! card text
//!  │
//!  ├─ 1. Scan       find [latex]…[/latex], [$]…[/$], [$$]…[/$$] regions
//!  ├─ 2. Normalize  decode &entities;, <br> → newline
//!  ├─ 3. Hash       sha256(preamble + body + postamble) → latex-<hash>.png
//!  ├─ 4. Cache      artifact exists? emit <img> link and stop
//!  └─ 5. Render     latex → dvipng → copy into the media directory
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardtex::{RenderConfig, Renderer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::builder("collection.media").build()?;
//!     let renderer = Renderer::new(config)?;
//!     let html = renderer.render_markup("Mass–energy: [latex]E=mc^2[/latex]");
//!     println!("{html}");
//!     Ok(())
//! }
//! ```
//!
//! A failed render never fails the call: the affected region degrades to an
//! inline error fragment carrying the escaped `latex`/`dvipng` log, and the
//! rest of the text is processed normally.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardtex` binary (clap + anyhow + tracing-subscriber) |
//!
//! ## Concurrency
//!
//! The library is synchronous and single-threaded by design. Rendering
//! briefly changes the process working directory (the typesetter writes its
//! outputs relative to the cwd), so drive at most one render at a time per
//! process. [`strip_markup`] and everything short of an actual render are
//! free of shared state.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RenderConfig, RenderConfigBuilder, DEFAULT_LATEX_POST, DEFAULT_LATEX_PRE};
pub use error::RenderError;
pub use renderer::Renderer;
pub use scan::{strip_markup, DelimiterKind};
