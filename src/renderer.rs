//! The [`Renderer`]: one configured rendering context.
//!
//! A renderer owns a [`RenderConfig`] plus a private temporary working
//! directory ([`tempfile::TempDir`]), created when the renderer is built and
//! removed when it is dropped. Host applications construct one renderer per
//! deck profile and reuse it across cards; the existence check makes repeated
//! resolution of the same formula a single `stat` call.
//!
//! Rendering changes the process working directory (restored by a guard, see
//! [`crate::pipeline::typeset`]), so a renderer must only run one render at a
//! time within a process. The API is fully synchronous; there is no internal
//! locking.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::pipeline::{cache, normalize, typeset};
use crate::scan;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Rendering context: deck-profile configuration plus a private workdir.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    workdir: TempDir,
}

impl Renderer {
    /// Build a renderer from a validated configuration.
    ///
    /// # Errors
    /// [`RenderError::InvalidConfig`] if the configuration fails validation
    /// (relevant when it was deserialised rather than built), or
    /// [`RenderError::Io`] if the temporary working directory cannot be
    /// created.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        let workdir = tempfile::Builder::new().prefix("cardtex").tempdir()?;
        debug!(workdir = %workdir.path().display(), "renderer created");
        Ok(Self { config, workdir })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Toggle whether missing artifacts may be rendered. Part of the deck
    /// profile, but hosts flip it at runtime around bulk operations.
    pub fn set_build(&mut self, build: bool) {
        self.config.build = build;
    }

    /// Convert text with embedded LaTeX regions into image links.
    ///
    /// Every matched region is replaced by an `<img src="latex-<hash>.png">`
    /// tag, a `[latex]…[/latex]` fallback (build disabled), or an inline
    /// error fragment. This never fails: render errors degrade to error text
    /// in place of the image.
    pub fn render_markup(&self, text: &str) -> String {
        scan::render_with(text, |wrapped| self.image_link(wrapped))
    }

    /// Resolve one wrapped LaTeX body to an image link, rendering on demand.
    ///
    /// The body is normalised, wrapped into a full document with the deck
    /// preamble/postamble, and content-hashed. An existing artifact
    /// short-circuits without touching the external tools.
    pub fn image_link(&self, latex: &str) -> String {
        let body = normalize::normalize_latex(latex);
        let document = format!(
            "{}\n{}\n{}",
            self.config.latex_pre, body, self.config.latex_post
        );
        let fname = cache::artifact_name(&document);
        let link = format!("<img src=\"{fname}\">");

        if cache::artifact_exists(&self.config.media_dir, &fname) {
            debug!(artifact = %fname, "cache hit");
            return link;
        }
        if !self.config.build {
            debug!(artifact = %fname, "build disabled, deferring render");
            return format!("[latex]{latex}[/latex]");
        }
        match typeset::build_image(&document, &fname, &self.config, self.workdir.path()) {
            Ok(()) => link,
            Err(err) => {
                warn!(artifact = %fname, error = %err, "render failed");
                err.to_html()
            }
        }
    }
}
