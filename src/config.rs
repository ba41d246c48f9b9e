//! Configuration types for LaTeX rendering.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. The struct replaces what older flashcard
//! implementations kept as module-level globals (the build toggle, the
//! external command lines): putting every knob on one value makes a renderer
//! self-contained, serialisable for logging, and safe to construct twice with
//! different deck profiles in the same process.
//!
//! Field names serialise in camelCase (`latexPre`, `latexPost`, …) so a
//! deck-profile JSON exported by the host application deserialises directly.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stock preamble for a 3×5in flashcard formula page.
///
/// `inputenc` with utf8 keeps the hashed document byte-identical to what the
/// typesetter consumes; `pagestyle{empty}` suppresses page numbers so the
/// tight crop contains only the formula.
pub const DEFAULT_LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\
\\special{papersize=3in,5in}\n\
\\usepackage[utf8]{inputenc}\n\
\\usepackage{amssymb,amsmath}\n\
\\pagestyle{empty}\n\
\\setlength{\\parindent}{0in}\n\
\\begin{document}";

/// Stock postamble.
pub const DEFAULT_LATEX_POST: &str = "\\end{document}";

fn default_latex_cmd() -> Vec<String> {
    vec!["latex".into(), "-interaction=nonstopmode".into()]
}

fn default_dvipng_cmd() -> Vec<String> {
    vec!["dvipng".into(), "-T".into(), "tight".into()]
}

fn default_dpi() -> u32 {
    200
}

fn default_build() -> bool {
    true
}

/// Configuration for a [`crate::Renderer`].
///
/// Built via [`RenderConfig::builder()`].
///
/// # Example
/// ```rust
/// use cardtex::RenderConfig;
///
/// let config = RenderConfig::builder("collection.media")
///     .dpi(200)
///     .latex_pre("\\documentclass{article}\\begin{document}")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Document preamble prepended to every formula (deck profile `latexPre`).
    pub latex_pre: String,

    /// Document postamble appended to every formula (deck profile `latexPost`).
    pub latex_post: String,

    /// Directory receiving rendered `latex-<hash>.png` artifacts.
    /// Created on demand by the render pipeline.
    pub media_dir: PathBuf,

    /// Whether missing artifacts may be rendered. Default: true.
    ///
    /// When false the renderer only serves pre-existing artifacts; an
    /// unresolved formula is handed back re-wrapped in `[latex]…[/latex]`
    /// so the host can rebuild it later.
    #[serde(default = "default_build")]
    pub build: bool,

    /// Raster resolution passed to dvipng as `-D`. Range: 50–1200. Default: 200.
    ///
    /// 200 DPI keeps formulas crisp at typical card-review zoom levels while
    /// staying small enough that a deck with thousands of formulas fits
    /// comfortably in the media directory.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Typesetting invocation: program plus leading arguments.
    /// Default: `latex -interaction=nonstopmode`.
    #[serde(default = "default_latex_cmd")]
    pub latex_cmd: Vec<String>,

    /// Raster-conversion invocation: program plus leading arguments.
    /// `-D <dpi>`, the input `.dvi` and output `.png` are appended by the
    /// pipeline. Default: `dvipng -T tight`.
    #[serde(default = "default_dvipng_cmd")]
    pub dvipng_cmd: Vec<String>,
}

impl RenderConfig {
    /// Create a new builder targeting `media_dir`.
    pub fn builder(media_dir: impl Into<PathBuf>) -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: RenderConfig {
                latex_pre: DEFAULT_LATEX_PRE.to_string(),
                latex_post: DEFAULT_LATEX_POST.to_string(),
                media_dir: media_dir.into(),
                build: default_build(),
                dpi: default_dpi(),
                latex_cmd: default_latex_cmd(),
                dvipng_cmd: default_dvipng_cmd(),
            },
        }
    }

    /// Validate constraints shared by the builder and JSON deserialisation.
    pub(crate) fn validate(&self) -> Result<(), RenderError> {
        if self.media_dir.as_os_str().is_empty() {
            return Err(RenderError::InvalidConfig(
                "media_dir must not be empty".into(),
            ));
        }
        if self.latex_cmd.is_empty() {
            return Err(RenderError::InvalidConfig(
                "latex_cmd must name a program".into(),
            ));
        }
        if self.dvipng_cmd.is_empty() {
            return Err(RenderError::InvalidConfig(
                "dvipng_cmd must name a program".into(),
            ));
        }
        if !(50..=1200).contains(&self.dpi) {
            return Err(RenderError::InvalidConfig(format!(
                "dpi must be 50–1200, got {}",
                self.dpi
            )));
        }
        Ok(())
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn latex_pre(mut self, pre: impl Into<String>) -> Self {
        self.config.latex_pre = pre.into();
        self
    }

    pub fn latex_post(mut self, post: impl Into<String>) -> Self {
        self.config.latex_post = post.into();
        self
    }

    pub fn build_enabled(mut self, build: bool) -> Self {
        self.config.build = build;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(50, 1200);
        self
    }

    pub fn latex_cmd<I, S>(mut self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.latex_cmd = cmd.into_iter().map(Into::into).collect();
        self
    }

    pub fn dvipng_cmd<I, S>(mut self, cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dvipng_cmd = cmd.into_iter().map(Into::into).collect();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = RenderConfig::builder("media").build().unwrap();
        assert!(config.build);
        assert_eq!(config.dpi, 200);
        assert_eq!(config.latex_cmd[0], "latex");
        assert_eq!(config.dvipng_cmd[0], "dvipng");
        assert!(config.latex_pre.contains("\\begin{document}"));
        assert_eq!(config.latex_post, "\\end{document}");
    }

    #[test]
    fn empty_media_dir_rejected() {
        let err = RenderConfig::builder("").build().unwrap_err();
        assert!(err.to_string().contains("media_dir"));
    }

    #[test]
    fn empty_command_rejected() {
        let err = RenderConfig::builder("media")
            .latex_cmd(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("latex_cmd"));
    }

    #[test]
    fn dpi_is_clamped() {
        let config = RenderConfig::builder("media").dpi(5000).build().unwrap();
        assert_eq!(config.dpi, 1200);
    }

    #[test]
    fn deck_profile_json_round_trip() {
        let json = r#"{
            "latexPre": "\\documentclass{article}\\begin{document}",
            "latexPost": "\\end{document}",
            "mediaDir": "collection.media"
        }"#;
        let config: RenderConfig = serde_json::from_str(json).unwrap();
        assert!(config.build, "build defaults to true");
        assert_eq!(config.dpi, 200);
        assert_eq!(config.media_dir, PathBuf::from("collection.media"));
        config.validate().unwrap();

        let out = serde_json::to_string(&config).unwrap();
        assert!(out.contains("\"latexPre\""), "camelCase keys: {out}");
    }
}
