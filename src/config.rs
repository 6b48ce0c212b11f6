use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

/// How the `vms` group picks its default `ansible_user`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupUserPolicy {
    /// The first VM in output order decides.
    #[default]
    First,
    /// The login shared by the most VMs; ties go to the one seen first.
    MostFrequent,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub terraform_bin: String,
    pub terraform_dir: Option<PathBuf>,
    pub output_name: String,
    pub default_ssh_user: String,
    pub ssh_port: u16,
    pub ssh_common_args: String,
    pub group_user: Option<String>,
    pub group_user_policy: GroupUserPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terraform_bin: "terraform".to_string(),
            terraform_dir: None,
            output_name: "vms".to_string(),
            default_ssh_user: "admin".to_string(),
            ssh_port: 22,
            ssh_common_args: "-o StrictHostKeyChecking=accept-new".to_string(),
            group_user: None,
            group_user_policy: GroupUserPolicy::default(),
        }
    }
}

impl Config {
    fn config_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|h| {
            PathBuf::from(h)
                .join(".config")
                .join("tfinventory")
                .join("config.yml")
        })
    }

    /// Load `path`, or the per-user config file when none is given.
    ///
    /// Never fails: Ansible runs this as a subprocess and a broken config
    /// must not break the play, so problems are logged and defaults used.
    pub fn load(path: Option<&Path>) -> Self {
        let explicit = path.is_some();
        let path = match path.map(Path::to_path_buf).or_else(Self::config_path) {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            if explicit {
                warn!("config file {} not found, using defaults", path.display());
            }
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{e:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        // An empty or comment-only file deserializes as `null`.
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }
}
