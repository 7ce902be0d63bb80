//! Cartridge Manifest
//!
//! The static descriptor every plugin folder carries, plus its parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::{PluginError, PluginResult};

/// Manifest file names, in lookup order
pub const MANIFEST_FILENAMES: [&str; 3] = ["manifest.json", "manifest.yaml", "manifest.yml"];

/// Difficulty tiers, totally ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Extreme];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "extreme" => Ok(Difficulty::Extreme),
            _ => Err(format!("Invalid difficulty: {}. Valid options: easy, medium, hard, extreme", s)),
        }
    }
}

/// Static plugin descriptor, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Unique game identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Declared difficulty progression, easiest first
    pub difficulty_levels: Vec<Difficulty>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Component the plugin exports; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,

    /// Cartridge API version the plugin targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
}

impl Manifest {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, title: T, difficulty_levels: Vec<Difficulty>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            difficulty_levels,
            description: None,
            version: None,
            author: None,
            entry: None,
            api_version: None,
        }
    }

    pub fn with_entry<S: Into<String>>(mut self, entry: S) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Name of the component this plugin exports
    pub fn entry_point(&self) -> &str {
        self.entry.as_deref().unwrap_or(&self.id)
    }

    pub fn declares(&self, difficulty: Difficulty) -> bool {
        self.difficulty_levels.contains(&difficulty)
    }
}

/// Parser for manifest files
#[derive(Debug, Default)]
pub struct ManifestParser;

impl ManifestParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a JSON manifest
    pub fn parse_json(&self, content: &str) -> PluginResult<Manifest> {
        serde_json::from_str(content)
            .map_err(|e| PluginError::manifest_invalid(format!("Failed to parse JSON: {}", e)))
    }

    /// Parse a YAML manifest
    pub fn parse_yaml(&self, content: &str) -> PluginResult<Manifest> {
        serde_yaml::from_str(content)
            .map_err(|e| PluginError::manifest_invalid(format!("Failed to parse YAML: {}", e)))
    }

    /// Validate required fields and the difficulty progression
    pub fn validate(&self, manifest: &Manifest) -> PluginResult<()> {
        let id = manifest.id.trim();
        if id.is_empty() {
            return Err(PluginError::manifest_invalid("Manifest id cannot be empty"));
        }
        if id != manifest.id || manifest.id.contains(|c: char| c.is_whitespace() || c == '/') {
            return Err(PluginError::manifest_invalid(format!(
                "Manifest id '{}' may not contain whitespace or '/'",
                manifest.id
            )));
        }

        if manifest.title.trim().is_empty() {
            return Err(PluginError::manifest_invalid(format!("Manifest '{}' has an empty title", manifest.id)));
        }

        if manifest.difficulty_levels.is_empty() {
            return Err(PluginError::manifest_invalid(format!(
                "Manifest '{}' declares no difficulty levels",
                manifest.id
            )));
        }

        if !manifest.difficulty_levels.windows(2).all(|pair| pair[0] < pair[1]) {
            return Err(PluginError::manifest_invalid(format!(
                "Manifest '{}' difficulty levels must be strictly ascending",
                manifest.id
            )));
        }

        if let Some(version) = &manifest.version {
            if !self.is_valid_version(version) {
                return Err(PluginError::manifest_invalid(format!("Invalid version format: {}", version)));
            }
        }

        if manifest.entry.as_deref().is_some_and(|entry| entry.trim().is_empty()) {
            return Err(PluginError::manifest_invalid(format!("Manifest '{}' has an empty entry", manifest.id)));
        }

        Ok(())
    }

    /// Basic version validation (major.minor or major.minor.patch)
    fn is_valid_version(&self, version: &str) -> bool {
        let parts: Vec<&str> = version.split('.').collect();
        (2..=3).contains(&parts.len()) && parts.iter().all(|part| part.parse::<u32>().is_ok())
    }
}

/// Locate the manifest file in a plugin folder
pub fn find_manifest(folder: &Path) -> Option<PathBuf> {
    MANIFEST_FILENAMES
        .iter()
        .map(|name| folder.join(name))
        .find(|path| path.is_file())
}

/// Load and validate the manifest of a plugin folder
pub fn load_manifest(folder: &Path) -> PluginResult<Manifest> {
    let path = find_manifest(folder)
        .ok_or_else(|| PluginError::manifest_missing(folder.display().to_string()))?;

    let content = fs::read_to_string(&path)
        .map_err(|e| PluginError::manifest_invalid(format!("Failed to read {}: {}", path.display(), e)))?;

    let parser = ManifestParser::new();
    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    let manifest = if is_json { parser.parse_json(&content)? } else { parser.parse_yaml(&content)? };

    parser.validate(&manifest)?;
    Ok(manifest)
}
