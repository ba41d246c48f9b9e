//! External render pipeline: `latex` → `dvipng` → media directory.
//!
//! Both tools are run synchronously with stdout and stderr captured into a
//! single `latex_log.txt` in the renderer's working directory. The log is an
//! artifact of one render attempt: it is truncated at the start of each
//! attempt and only read back when an invocation fails.
//!
//! The typesetter resolves `\input` and writes its outputs relative to the
//! current directory, so the render runs inside the renderer's private
//! working directory. The switch is process-global state, guarded by
//! [`WorkdirGuard`] so the previous directory is restored on success, error
//! and panic alike. This is also why a [`crate::Renderer`] must not be driven
//! from two threads at once.

use crate::config::RenderConfig;
use crate::error::RenderError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

const TEX_FILE: &str = "tmp.tex";
const DVI_FILE: &str = "tmp.dvi";
const PNG_FILE: &str = "tmp.png";
const LOG_FILE: &str = "latex_log.txt";

/// RAII guard around a working-directory change.
struct WorkdirGuard {
    previous: PathBuf,
}

impl WorkdirGuard {
    fn enter(dir: &Path) -> Result<Self, RenderError> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(Self { previous })
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.previous) {
            tracing::warn!("could not restore working directory: {err}");
        }
    }
}

/// PATH handed to child processes.
///
/// macOS GUI sessions typically launch without the TeX toolchain location on
/// PATH, so `/usr/texbin` is appended — for the children only, the process
/// environment stays untouched.
fn child_path() -> Option<String> {
    #[cfg(target_os = "macos")]
    {
        let path = std::env::var("PATH").unwrap_or_default();
        Some(format!("{path}:/usr/texbin"))
    }
    #[cfg(not(target_os = "macos"))]
    None
}

/// Resolve `program` on the (possibly augmented) PATH before attempting to
/// spawn anything, so an absent toolchain surfaces as [`RenderError::ToolMissing`]
/// rather than a spawn failure halfway through a render.
fn locate(program: &str) -> Result<PathBuf, RenderError> {
    let found = match child_path() {
        Some(paths) => which::which_in(program, Some(&paths), std::env::current_dir()?),
        None => which::which(program),
    };
    found.map_err(|_| RenderError::ToolMissing {
        program: program.to_string(),
    })
}

/// Run one configured invocation with `extra` arguments appended, combined
/// output going to `log`. Returns whether the process exited successfully.
fn run_logged(cmd: &[String], extra: &[&str], log: &File) -> Result<bool, RenderError> {
    let mut command = Command::new(&cmd[0]);
    command
        .args(&cmd[1..])
        .args(extra)
        .stdin(Stdio::null())
        .stdout(log.try_clone()?)
        .stderr(log.try_clone()?);
    if let Some(path) = child_path() {
        command.env("PATH", path);
    }
    debug!(program = %cmd[0], "running external tool");
    let status = command.status()?;
    Ok(status.success())
}

fn read_log(workdir: &Path) -> String {
    fs::read_to_string(workdir.join(LOG_FILE)).unwrap_or_default()
}

/// Typeset `document` and install the resulting PNG into the media directory
/// under `fname`.
///
/// Steps: write `tmp.tex`, ensure the media directory exists, run the
/// typesetting invocation, run the raster conversion, copy `tmp.png` into
/// place (`fs::copy` carries permissions across). Any non-zero exit fails the
/// attempt with the captured log; nothing is written to the media directory
/// on failure, so the next resolve for the same content retries.
pub fn build_image(
    document: &str,
    fname: &str,
    config: &RenderConfig,
    workdir: &Path,
) -> Result<(), RenderError> {
    locate(&config.latex_cmd[0])?;
    locate(&config.dvipng_cmd[0])?;

    fs::write(workdir.join(TEX_FILE), document)?;
    fs::create_dir_all(&config.media_dir)?;

    // Resolve the target before changing directory; media_dir may be relative
    // to the caller's cwd.
    let target = if config.media_dir.is_absolute() {
        config.media_dir.join(fname)
    } else {
        std::env::current_dir()?.join(&config.media_dir).join(fname)
    };

    // Truncates the log of any previous attempt for this renderer.
    let log = File::create(workdir.join(LOG_FILE))?;

    let _guard = WorkdirGuard::enter(workdir)?;

    if !run_logged(&config.latex_cmd, &[TEX_FILE], &log)? {
        return Err(RenderError::Typeset {
            log: read_log(workdir),
        });
    }

    let dpi = config.dpi.to_string();
    if !run_logged(
        &config.dvipng_cmd,
        &["-D", &dpi, DVI_FILE, "-o", PNG_FILE],
        &log,
    )? {
        return Err(RenderError::Raster {
            log: read_log(workdir),
        });
    }

    fs::copy(workdir.join(PNG_FILE), &target)?;
    info!(artifact = fname, "rendered formula");
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Mutex, MutexGuard};

    /// Tests that reach [`super::WorkdirGuard`] change the process-wide cwd,
    /// so they serialise on this lock.
    static CWD_LOCK: Mutex<()> = Mutex::new(());

    pub fn lock_cwd() -> MutexGuard<'static, ()> {
        CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
