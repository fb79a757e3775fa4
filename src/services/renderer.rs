//! External renderer invocation.
//!
//! Rendering is best effort. A failed run is reported as a [`RenderWarning`]
//! next to an otherwise successful generation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Longest stderr excerpt carried in a warning.
const STDERR_EXCERPT: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderWarning {
    #[error("renderer executable not found: {0}")]
    NotFound(String),

    #[error("failed to start renderer: {0}")]
    Spawn(String),

    #[error("renderer timed out after {0}s")]
    TimedOut(u64),

    #[error("renderer exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

#[derive(Debug, Clone)]
pub struct SceneRenderer {
    executable: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SceneRenderer {
    pub fn new(executable: impl Into<String>, args: Vec<String>, timeout_seconds: u64) -> Self {
        Self {
            executable: executable.into(),
            args,
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Runs `<executable> <args...> <scene_path>`.
    #[instrument(skip(self), fields(executable = %self.executable))]
    pub async fn render(&self, scene_path: &Path) -> Result<(), RenderWarning> {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.args)
            .arg(scene_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderWarning::NotFound(self.executable.clone())
            } else {
                RenderWarning::Spawn(e.to_string())
            }
        })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| RenderWarning::Spawn(e.to_string()))?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Renderer timed out");
                return Err(RenderWarning::TimedOut(self.timeout.as_secs()));
            }
        };

        if output.status.success() {
            info!(scene = %scene_path.display(), "Renderer finished");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = tail(stderr.trim(), STDERR_EXCERPT).to_string();
        warn!(code = ?output.status.code(), stderr = %stderr, "Renderer failed");
        Err(RenderWarning::NonZeroExit {
            code: output.status.code(),
            stderr,
        })
    }

    /// Whether the executable exists, either as a path or on `PATH`.
    pub fn is_available(&self) -> bool {
        let candidate = Path::new(&self.executable);
        if candidate.components().count() > 1 {
            return candidate.is_file();
        }
        std::env::var_os("PATH")
            .map(|paths| {
                std::env::split_paths(&paths)
                    .map(|dir| dir.join(&self.executable))
                    .any(|path: PathBuf| path.is_file())
            })
            .unwrap_or(false)
    }
}

/// Last `max` bytes of `text`, cut on a char boundary.
fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
