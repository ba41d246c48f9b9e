//! CLI binary for cardtex.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `RenderConfig`, runs the scanner over one input, and prints the result.

use anyhow::{Context, Result};
use cardtex::{RenderConfig, Renderer};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render all formulas in a card file, artifacts into ./collection.media
  cardtex card.html

  # Explicit media directory and output file
  cardtex card.html -m ~/decks/physics.media -o rendered.html

  # Deck profile with a custom preamble
  cardtex --profile deck.json card.html

  # Use pre-rendered artifacts only; leave missing formulas as [latex]…[/latex]
  cardtex --no-build card.html

  # Plain-text extraction: remove formulas entirely
  cardtex --strip card.html

  # From stdin to stdout
  echo '[latex]E=mc^2[/latex]' | cardtex -

REQUIRED EXTERNAL TOOLS:
  latex     typesets tmp.tex into a DVI page description
  dvipng    converts the DVI into a tightly-cropped PNG

  Both must be on PATH (a TeX Live or MiKTeX install provides them).
  With --no-build or --strip neither tool is touched.

DECK PROFILE (--profile):
  JSON object with camelCase keys matching the host application's export:
    { "latexPre": "…", "latexPost": "…", "mediaDir": "…",
      "build": true, "dpi": 200 }
"#;

/// Render embedded LaTeX in flashcard text into cached PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "cardtex",
    version,
    about = "Render embedded LaTeX in flashcard text into cached PNG images",
    long_about = "Scan text for [latex]…[/latex], [$]…[/$] and [$$]…[/$$] regions, render \
each one to a PNG via latex + dvipng, and replace the region with an <img> tag pointing \
into the media directory. Already-rendered formulas are reused via a content-hash cache.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input file, or "-" for stdin.
    input: String,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "CARDTEX_OUTPUT")]
    output: Option<PathBuf>,

    /// Media directory receiving latex-<hash>.png artifacts.
    #[arg(short, long, env = "CARDTEX_MEDIA_DIR", default_value = "collection.media")]
    media_dir: PathBuf,

    /// Deck profile JSON (camelCase keys); flags below override its values.
    #[arg(long, env = "CARDTEX_PROFILE")]
    profile: Option<PathBuf>,

    /// File containing the document preamble (deck profile latexPre).
    #[arg(long)]
    preamble_file: Option<PathBuf>,

    /// File containing the document postamble (deck profile latexPost).
    #[arg(long)]
    postamble_file: Option<PathBuf>,

    /// Raster resolution for dvipng (50–1200).
    #[arg(long, env = "CARDTEX_DPI",
          value_parser = clap::value_parser!(u32).range(50..=1200))]
    dpi: Option<u32>,

    /// Use existing artifacts only; never invoke latex/dvipng.
    #[arg(long)]
    no_build: bool,

    /// Strip all LaTeX regions instead of rendering them.
    #[arg(long)]
    strip: bool,

    /// Debug-level logging to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let text = if cli.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read input file '{}'", cli.input))?
    };

    // ── Transform ────────────────────────────────────────────────────────
    let result = if cli.strip {
        cardtex::strip_markup(&text)
    } else {
        let config = build_config(&cli)?;
        let renderer = Renderer::new(config).context("Failed to create renderer")?;
        renderer.render_markup(&text)
    };

    // ── Write output ─────────────────────────────────────────────────────
    match cli.output {
        Some(ref path) => std::fs::write(path, &result)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?,
        None => io::stdout()
            .write_all(result.as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}

/// Assemble the render configuration: profile JSON first, flags on top.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    let mut config = match cli.profile {
        Some(ref path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile '{}'", path.display()))?;
            serde_json::from_str::<RenderConfig>(&json)
                .with_context(|| format!("Failed to parse profile '{}'", path.display()))?
        }
        None => RenderConfig::builder(&cli.media_dir)
            .build()
            .context("Invalid configuration")?,
    };

    // Flags override profile values.
    if cli.profile.is_some() && cli.media_dir != PathBuf::from("collection.media") {
        config.media_dir = cli.media_dir.clone();
    }
    if let Some(ref path) = cli.preamble_file {
        config.latex_pre = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preamble '{}'", path.display()))?;
    }
    if let Some(ref path) = cli.postamble_file {
        config.latex_post = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read postamble '{}'", path.display()))?;
    }
    if let Some(dpi) = cli.dpi {
        config.dpi = dpi;
    }
    if cli.no_build {
        config.build = false;
    }

    Ok(config)
}
