use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::patch::PatchSpec;
use crate::utils::io;

/// File name looked up in the working directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "subpatch.json";

/// All configurable values that can be overridden via subpatch.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchConfig {
    #[serde(default = "default_root")]
    pub root: String,

    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default = "default_replacement")]
    pub replacement: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extensions: default_extensions(),
            marker: default_marker(),
            replacement: default_replacement(),
        }
    }
}

impl PatchConfig {
    /// Validate and convert into the patcher's spec.
    pub fn to_spec(&self) -> Result<PatchSpec> {
        PatchSpec::new(
            self.extensions.clone(),
            self.marker.clone(),
            self.replacement.clone(),
        )
    }

    /// Root directory, resolved against `base` when relative.
    pub fn root_in(&self, base: &Path) -> PathBuf {
        let root = Path::new(&self.root);
        if root.is_absolute() {
            root.to_path_buf()
        } else {
            base.join(root)
        }
    }
}

// =============================================================================
// Default value functions (match current hardcoded behavior)
// =============================================================================

pub fn default_root() -> String {
    "src".to_string()
}

pub fn default_extensions() -> Vec<String> {
    ["*.tsx", "*.ts", "*.jsx", "*.js", "*.mdx"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

pub fn default_marker() -> String {
    "zen.".to_string()
}

pub fn default_replacement() -> String {
    "zen-".to_string()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Resolve configuration for a run started in `cwd`.
///
/// An explicit path must exist. Without one, `subpatch.json` in `cwd` is used
/// when present, otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<PatchConfig> {
    match explicit {
        Some(path) => load_config_from_file(path),
        None => {
            let path = cwd.join(CONFIG_FILE_NAME);
            if path.is_file() {
                load_config_from_file(&path)
            } else {
                Ok(PatchConfig::default())
            }
        }
    }
}

/// Parse a config file. Missing keys fall back to their defaults.
pub fn load_config_from_file(path: &Path) -> Result<PatchConfig> {
    let content = io::read_bytes(path, &format!("read {}", path.display()))?;
    parse_config(&content, &path.display().to_string())
}

/// Bytes that are not UTF-8 fail here as invalid JSON, like any other syntax error.
fn parse_config(content: &[u8], source: &str) -> Result<PatchConfig> {
    serde_json::from_slice(content).map_err(|e| Error::config_invalid_json(source, e))
}
