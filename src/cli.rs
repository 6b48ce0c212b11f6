use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// tfinventory - Ansible dynamic inventory built from Terraform outputs
#[derive(Parser, Debug, Clone)]
#[command(name = "tfinventory", version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["list", "host"])))]
pub struct Args {
    /// Print the whole inventory as JSON
    #[arg(long)]
    pub list: bool,

    /// Print variables for a single host (always empty, see `_meta.hostvars`)
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Terraform working directory to read outputs from
    #[arg(long, env = "TERRAFORM_DIR")]
    pub terraform_dir: Option<PathBuf>,

    /// Path to config file (defaults to ~/.config/tfinventory/config.yml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// What Ansible asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Host(String),
}

impl Args {
    pub fn mode(&self) -> Mode {
        match &self.host {
            Some(name) => Mode::Host(name.clone()),
            None => Mode::List,
        }
    }
}
