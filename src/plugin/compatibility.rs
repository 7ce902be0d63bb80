//! Cartridge API Compatibility
//!
//! The host API version is generated at build time from
//! `package.metadata.puzzlefeed.api_version` in Cargo.toml. Versions use the
//! YYYYMMDD format; cartridges targeting the same year are compatible.

use super::error::{PluginError, PluginResult};
use super::manifest::Manifest;

include!(concat!(env!("OUT_DIR"), "/version_api.rs"));

/// Current cartridge API version of this host
pub fn host_api_version() -> u32 {
    HOST_API_VERSION
}

/// Checker for manifest API versions
#[derive(Debug, Clone, Copy)]
pub struct VersionCompatibilityChecker {
    api_version: u32,
}

impl VersionCompatibilityChecker {
    pub fn new(api_version: u32) -> Self {
        Self { api_version }
    }

    /// Checker for the version this host was built with
    pub fn for_host() -> Self {
        Self::new(host_api_version())
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Major version (year) of an API version
    pub fn major_version(api_version: u32) -> u32 {
        api_version / 10000
    }

    pub fn is_api_compatible(&self, plugin_api_version: u32) -> bool {
        Self::major_version(self.api_version) == Self::major_version(plugin_api_version)
    }

    /// Manifests without an API version are assumed to target this host
    pub fn check_manifest(&self, manifest: &Manifest) -> PluginResult<()> {
        match manifest.api_version {
            Some(version) if !self.is_api_compatible(version) => Err(PluginError::version_incompatible(format!(
                "Game '{}' targets API version {} but host version is {}",
                manifest.id, version, self.api_version
            ))),
            _ => Ok(()),
        }
    }
}

impl Default for VersionCompatibilityChecker {
    fn default() -> Self {
        Self::for_host()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::manifest::Difficulty;

    #[test]
    fn test_host_version_format() {
        let version = host_api_version();
        assert!((20000000..=29991231).contains(&version), "API version should be YYYYMMDD");
    }

    #[test]
    fn test_same_year_is_compatible() {
        let checker = VersionCompatibilityChecker::new(20250727);
        assert!(checker.is_api_compatible(20250101));
        assert!(checker.is_api_compatible(20251231));
        assert!(!checker.is_api_compatible(20240727));
        assert!(!checker.is_api_compatible(20260101));
    }

    #[test]
    fn test_check_manifest() {
        let checker = VersionCompatibilityChecker::new(20250727);
        let mut manifest = Manifest::new("pipes", "Pipes", vec![Difficulty::Easy]);
        assert!(checker.check_manifest(&manifest).is_ok());

        manifest.api_version = Some(20250301);
        assert!(checker.check_manifest(&manifest).is_ok());

        manifest.api_version = Some(20230301);
        let err = checker.check_manifest(&manifest).unwrap_err();
        assert!(matches!(err, PluginError::VersionIncompatible { .. }));
        assert!(err.to_string().contains("20230301"));
    }
}
