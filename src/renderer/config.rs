//! Options for DOT rendering

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LoadError;

/// Configuration options for a render call
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Highlight records that are unconfirmed or unchanged since confirmation
    pub version_support: bool,

    /// CI type -> icon image path
    pub images: IndexMap<String, String>,

    /// Directory that relative image paths are resolved against
    pub image_root: Option<PathBuf>,

    /// Only emit edges whose endpoints were both declared
    pub gate_edges: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            version_support: false,
            images: IndexMap::new(),
            image_root: None,
            gate_edges: true,
        }
    }
}

/// TOML structure for deserializing options
#[derive(Deserialize)]
struct TomlOptions {
    version_support: Option<bool>,
    image_root: Option<PathBuf>,
    gate_edges: Option<bool>,
    #[serde(default)]
    images: IndexMap<String, String>,
}

impl RenderOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load options from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlOptions = toml::from_str(content)?;
        let defaults = Self::default();
        Ok(Self {
            version_support: parsed.version_support.unwrap_or(defaults.version_support),
            images: parsed.images,
            image_root: parsed.image_root,
            gate_edges: parsed.gate_edges.unwrap_or(defaults.gate_edges),
        })
    }

    /// Enable or disable version highlighting
    pub fn with_version_support(mut self, enabled: bool) -> Self {
        self.version_support = enabled;
        self
    }

    /// Register the icon for a CI type
    pub fn with_image(mut self, ci_type: impl Into<String>, path: impl Into<String>) -> Self {
        self.images.insert(ci_type.into(), path.into());
        self
    }

    /// Set the directory relative image paths resolve against
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    /// Enable or disable edge gating on declared identifiers
    pub fn with_edge_gating(mut self, gate: bool) -> Self {
        self.gate_edges = gate;
        self
    }

    /// Image path for a CI type, or "" when none is registered
    pub fn image_for(&self, ci_type: &str) -> String {
        let Some(path) = self.images.get(ci_type) else {
            return String::new();
        };
        match &self.image_root {
            Some(root) if Path::new(path).is_relative() => root.join(path).display().to_string(),
            _ => path.clone(),
        }
    }
}
