//! `surveyor.toml` parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use surveyor::Limits;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "surveyor.toml";

/// The top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// JSON snapshot the store is loaded from and saved to.
    pub store: PathBuf,
    /// Use the colorful prompt theme.
    pub colorful: bool,
    /// Length bounds for titles, names and answers.
    pub limits: Limits,
    /// Administrators seeded into the store if it does not know them yet.
    pub admins: Vec<AdminConfig>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store: PathBuf::from("surveyor.json"),
            colorful: true,
            limits: Limits::default(),
            admins: Vec::new(),
        }
    }
}

/// An `[[admins]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    pub name: String,
    pub username: String,
    /// Hex SHA-256 of the password.
    pub password_sha256: String,
}

impl CliConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load `explicit` if given, else `surveyor.toml` in `dir` if it exists,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("invalid configuration")
    }
}
