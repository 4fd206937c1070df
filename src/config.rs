//! Atlas configuration, loaded from the `[atlas]` table of a TOML file.
//!
//! Every field is optional; missing values fall back to defaults sized for
//! a conservative GPU (1000px pages, 1000 layers).

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::atlas::AtlasLimits;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub atlas: AtlasSection,
}

/// The `[atlas]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasSection {
    /// Page width and height in pixels (the GPU's max 2D texture size).
    pub max_texture_size: u32,
    /// Maximum layers in the texture array.
    pub max_array_len: u32,
    /// Cell width in pixels. Both cell dimensions must be set to lay out
    /// the atlas at startup; otherwise the renderer does it once fonts load.
    pub cell_width: Option<u32>,
    pub cell_height: Option<u32>,
}

impl Default for AtlasSection {
    fn default() -> Self {
        let limits = AtlasLimits::default();
        Self {
            max_texture_size: limits.max_texture_size,
            max_array_len: limits.max_array_len,
            cell_width: None,
            cell_height: None,
        }
    }
}

impl AtlasConfig {
    /// Parse a TOML document.
    pub fn from_toml(data: &str) -> Result<Self, String> {
        toml::from_str(data).map_err(|e| format!("parse error: {e}"))
    }

    /// Load from `path`, returning an error message on failure.
    pub fn try_load(path: &Path) -> Result<Self, String> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        toml::from_str(&data).map_err(|e| format!("parse error in {}: {e}", path.display()))
    }

    /// Load from `path`. Returns defaults if the file doesn't exist or
    /// can't be parsed.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cfg) => {
                debug!("config: loaded from {}", path.display());
                cfg
            }
            Err(e) => {
                if path.exists() {
                    warn!("config: {e}");
                }
                Self::default()
            }
        }
    }

    pub fn limits(&self) -> AtlasLimits {
        AtlasLimits {
            max_texture_size: self.atlas.max_texture_size,
            max_array_len: self.atlas.max_array_len,
        }
    }

    /// Cell size, if both dimensions are configured and non-zero.
    pub fn cell_size(&self) -> Option<(u32, u32)> {
        match (self.atlas.cell_width, self.atlas.cell_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}
