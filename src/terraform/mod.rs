pub mod types;

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use log::{debug, warn};
use thiserror::Error;

use types::OutputSet;

/// Anything that can hand over the current Terraform outputs.
///
/// `None` means "no data": callers render an empty inventory instead of failing.
pub trait OutputSource {
    fn fetch(&self) -> Option<OutputSet>;
}

/// Reasons the outputs could not be read. These all collapse to "no data"
/// for the caller but are logged individually.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("terraform directory does not exist: {0}")]
    MissingDir(PathBuf),
    #[error("failed to run `{bin}`: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: io::Error,
    },
    #[error("`{bin} output -json` failed ({status}): {stderr}")]
    Exit {
        bin: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("terraform output is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runs `terraform output -json` inside a Terraform working directory.
#[derive(Debug, Clone)]
pub struct TerraformCli {
    pub bin: String,
    pub dir: PathBuf,
}

impl TerraformCli {
    pub fn new(bin: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            dir: dir.into(),
        }
    }

    pub fn try_fetch(&self) -> Result<OutputSet, SourceError> {
        if !self.dir.exists() {
            return Err(SourceError::MissingDir(self.dir.clone()));
        }

        let output = Command::new(&self.bin)
            .arg("output")
            .arg("-json")
            .current_dir(&self.dir)
            .output()
            .map_err(|source| SourceError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        // Uninitialised workspaces and workspaces without outputs both land here.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Exit {
                bin: self.bin.clone(),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl OutputSource for TerraformCli {
    fn fetch(&self) -> Option<OutputSet> {
        match self.try_fetch() {
            Ok(outputs) => {
                debug!(
                    "read {} terraform output(s) from {}",
                    outputs.len(),
                    self.dir.display()
                );
                Some(outputs)
            }
            Err(e @ SourceError::MissingDir(_)) => {
                debug!("{e}");
                None
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }
}

/// `<directory of the executable>/../terraform`, so an install laid out as
/// `repo/ansible/inventory/<bin>` reads `repo/ansible/terraform`.
pub fn default_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let exe_dir = exe.parent()?;
    Some(exe_dir.parent().unwrap_or(exe_dir).join("terraform"))
}

/// Pick the directory to read from: explicit override first, then config,
/// then the executable-relative default.
pub fn resolve_dir(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    cli.or(config)
        .map(Path::to_path_buf)
        .or_else(default_dir)
        .unwrap_or_else(|| PathBuf::from("terraform"))
}
