//! Error types for the cardtex library.
//!
//! Render failures are deliberately *soft*: the Markup Scanner must always
//! complete, so every [`RenderError`] raised while producing an image is
//! absorbed at the cache boundary and converted into an inline HTML fragment
//! via [`RenderError::to_html`]. The only error a caller ever sees as a hard
//! `Err` is [`RenderError::InvalidConfig`], returned from builder validation
//! and [`crate::Renderer::new`].

use thiserror::Error;

/// All errors raised by the cardtex library.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The typesetting invocation (`latex`) exited with a non-zero status.
    /// `log` holds the combined stdout/stderr captured for this attempt.
    #[error("latex exited with a non-zero status")]
    Typeset { log: String },

    /// The raster conversion (`dvipng`) exited with a non-zero status.
    #[error("dvipng exited with a non-zero status")]
    Raster { log: String },

    /// An external program could not be found on PATH.
    #[error("'{program}' was not found on PATH")]
    ToolMissing { program: String },

    /// Filesystem failure while staging the render (temp file, media dir,
    /// artifact copy, working-directory switch).
    #[error("I/O error during render: {0}")]
    Io(#[from] std::io::Error),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RenderError {
    /// Name of the external tool implicated in this error, for the
    /// user-visible fragment.
    fn tool(&self) -> &str {
        match self {
            RenderError::Raster { .. } => "dvipng",
            RenderError::ToolMissing { program } => program.as_str(),
            _ => "latex",
        }
    }

    /// Captured subprocess log, if this error carries one.
    fn log(&self) -> Option<&str> {
        match self {
            RenderError::Typeset { log } | RenderError::Raster { log } => {
                let trimmed = log.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Convert into the inline HTML fragment shown in place of the image.
    ///
    /// With a captured log the fragment embeds it escaped inside
    /// `<small><pre>…</pre></small>`; without one (tools absent, I/O fault)
    /// it falls back to an installation hint naming both required tools.
    pub fn to_html(&self) -> String {
        match self.log() {
            Some(log) => format!(
                "Error executing {}.<br><small><pre>{}</pre></small>",
                self.tool(),
                html_escape::encode_text(log),
            ),
            None => format!(
                "Error executing {}.<br>Have you installed latex and dvipng?",
                self.tool(),
            ),
        }
    }
}
