//! Pipeline stages for formula rendering.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! is independently testable and the external-tool stage can be exercised (or
//! skipped) on its own in CI.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ normalize ──▶ cache ──▶ typeset
//! (delims)  (entities)   (sha256)  (latex + dvipng)
//! ```
//!
//! 1. [`crate::scan`] — find delimited regions and wrap their bodies
//! 2. [`normalize`]   — decode HTML entities, turn `<br>` into newlines
//! 3. [`cache`]       — derive the `latex-<hash>.png` artifact name and
//!    short-circuit when it already exists in the media directory
//! 4. [`typeset`]     — drive `latex` and `dvipng` as subprocesses; the only
//!    stage with side effects beyond an existence check

pub mod cache;
pub mod normalize;
pub mod typeset;
