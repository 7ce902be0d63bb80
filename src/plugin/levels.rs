//! Level Loading
//!
//! Levels live under `levels/<difficulty>/<n>.json` inside a plugin folder.
//! They are read and validated once during the scan; afterwards a loader
//! only hands out the immutable payloads it indexed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::{PluginError, PluginResult};
use super::manifest::{Difficulty, Manifest};
use super::traits::GameComponent;
use crate::contract::LevelContext;

/// Directory inside a plugin folder holding level files
pub const LEVELS_DIR: &str = "levels";

/// Game-defined serialized level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPayload {
    pub layout: String,
}

impl LevelPayload {
    pub fn new<S: Into<String>>(layout: S) -> Self {
        Self { layout: layout.into() }
    }
}

/// Pure mapping from (difficulty, level number) to a level payload
pub trait LevelLoader: Send + Sync {
    /// Load one level
    fn load(&self, difficulty: Difficulty, level_number: u32) -> PluginResult<LevelPayload>;

    /// Playable level numbers for a difficulty, ascending
    fn level_numbers(&self, difficulty: Difficulty) -> Vec<u32>;

    fn level_count(&self, difficulty: Difficulty) -> usize {
        self.level_numbers(difficulty).len()
    }
}

/// Loader over levels held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticLevelLoader {
    game_id: String,
    levels: BTreeMap<Difficulty, BTreeMap<u32, LevelPayload>>,
}

impl StaticLevelLoader {
    pub fn new<S: Into<String>>(game_id: S) -> Self {
        Self { game_id: game_id.into(), levels: BTreeMap::new() }
    }

    pub fn with_level(mut self, difficulty: Difficulty, level_number: u32, level: LevelPayload) -> Self {
        self.insert(difficulty, level_number, level);
        self
    }

    /// Add a level; the first payload stored for a slot wins
    pub fn insert(&mut self, difficulty: Difficulty, level_number: u32, level: LevelPayload) -> bool {
        let slot = self.levels.entry(difficulty).or_default();
        if slot.contains_key(&level_number) {
            return false;
        }
        slot.insert(level_number, level);
        true
    }

    pub fn total_levels(&self) -> usize {
        self.levels.values().map(BTreeMap::len).sum()
    }
}

impl LevelLoader for StaticLevelLoader {
    fn load(&self, difficulty: Difficulty, level_number: u32) -> PluginResult<LevelPayload> {
        self.levels
            .get(&difficulty)
            .and_then(|levels| levels.get(&level_number))
            .cloned()
            .ok_or_else(|| PluginError::level_not_found(&self.game_id, difficulty, level_number))
    }

    fn level_numbers(&self, difficulty: Difficulty) -> Vec<u32> {
        self.levels
            .get(&difficulty)
            .map(|levels| levels.keys().copied().collect())
            .unwrap_or_default()
    }
}

/// Levels indexed from a plugin folder, plus the files that were refused
#[derive(Debug)]
pub struct LevelIndex {
    pub loader: StaticLevelLoader,
    pub rejected: Vec<(PathBuf, PluginError)>,
}

/// Read and validate every level file of a plugin folder
pub fn index_levels(folder: &Path, manifest: &Manifest, component: &dyn GameComponent) -> LevelIndex {
    let mut index = LevelIndex { loader: StaticLevelLoader::new(&manifest.id), rejected: Vec::new() };
    let levels_dir = folder.join(LEVELS_DIR);
    if !levels_dir.is_dir() {
        log::debug!("No levels directory for '{}'", manifest.id);
        return index;
    }

    for tier_dir in sorted_entries(&levels_dir, &mut index.rejected) {
        if !tier_dir.is_dir() {
            continue;
        }
        let tier_name = file_name(&tier_dir);
        let difficulty = match tier_name.parse::<Difficulty>() {
            Ok(difficulty) if manifest.declares(difficulty) => difficulty,
            _ => {
                let label = format!("{}/{}", manifest.id, tier_name);
                index.rejected.push((
                    tier_dir.clone(),
                    PluginError::malformed_level(label, "difficulty is not declared in the manifest"),
                ));
                continue;
            }
        };

        for level_path in sorted_entries(&tier_dir, &mut index.rejected) {
            if level_path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match load_level_file(&level_path, manifest, difficulty, component) {
                Ok((level_number, payload)) => {
                    if !index.loader.insert(difficulty, level_number, payload) {
                        let label = format!("{}/{}/{}", manifest.id, difficulty, level_number);
                        let e = PluginError::malformed_level(label, "duplicate level number");
                        log::warn!("Excluding level {}: {}", level_path.display(), e);
                        index.rejected.push((level_path, e));
                    }
                }
                Err(e) => {
                    log::warn!("Excluding level {}: {}", level_path.display(), e);
                    index.rejected.push((level_path, e));
                }
            }
        }
    }

    log::debug!(
        "Indexed {} levels for '{}' ({} rejected)",
        index.loader.total_levels(),
        manifest.id,
        index.rejected.len()
    );
    index
}

fn load_level_file(
    path: &Path,
    manifest: &Manifest,
    difficulty: Difficulty,
    component: &dyn GameComponent,
) -> PluginResult<(u32, LevelPayload)> {
    let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default();
    let label = format!("{}/{}/{}", manifest.id, difficulty, stem);

    let level_number = stem
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| PluginError::malformed_level(&label, "file name must be a positive level number"))?;

    let content = fs::read_to_string(path)
        .map_err(|e| PluginError::malformed_level(&label, format!("unreadable: {}", e)))?;
    let payload: LevelPayload = serde_json::from_str(&content)
        .map_err(|e| PluginError::malformed_level(&label, format!("invalid JSON: {}", e)))?;

    let context = LevelContext::new(&manifest.id, difficulty, level_number);
    component
        .validate_level(&context, &payload)
        .map_err(|e| PluginError::malformed_level(&label, e.to_string()))?;

    Ok((level_number, payload))
}

fn sorted_entries(dir: &Path, rejected: &mut Vec<(PathBuf, PluginError)>) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
            paths.sort();
            paths
        }
        Err(e) => {
            rejected.push((dir.to_path_buf(), PluginError::from(e)));
            Vec::new()
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::flow_component;

    fn write_level(root: &Path, tier: &str, name: &str, layout: &str) {
        let dir = root.join(LEVELS_DIR).join(tier);
        fs::create_dir_all(&dir).unwrap();
        let body = serde_json::json!({ "layout": layout }).to_string();
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_static_loader_lookup() {
        let loader = StaticLevelLoader::new("pipes")
            .with_level(Difficulty::Easy, 2, LevelPayload::new("S\nP"))
            .with_level(Difficulty::Easy, 1, LevelPayload::new("L P"));

        assert_eq!(loader.level_numbers(Difficulty::Easy), vec![1, 2]);
        assert_eq!(loader.level_count(Difficulty::Hard), 0);
        assert_eq!(loader.load(Difficulty::Easy, 2).unwrap().layout, "S\nP");

        let err = loader.load(Difficulty::Hard, 1).unwrap_err();
        assert!(matches!(err, PluginError::LevelNotFound { .. }));
    }

    #[test]
    fn test_first_payload_wins() {
        let mut loader = StaticLevelLoader::new("pipes");
        assert!(loader.insert(Difficulty::Easy, 1, LevelPayload::new("S\nP")));
        assert!(!loader.insert(Difficulty::Easy, 1, LevelPayload::new("X\nP")));
        assert_eq!(loader.load(Difficulty::Easy, 1).unwrap().layout, "S\nP");
    }

    #[test]
    fn test_index_levels_rejects_bad_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_level(root, "easy", "1.json", "S\nP");
        write_level(root, "easy", "2.json", "S Q\nP P");
        write_level(root, "easy", "zero.json", "S\nP");
        write_level(root, "hard", "1.json", "S\nP");
        fs::write(root.join(LEVELS_DIR).join("easy").join("notes.txt"), "ignored").unwrap();

        let manifest = Manifest::new("pipes", "Pipes", vec![Difficulty::Easy]);
        let component = flow_component();
        let index = index_levels(root, &manifest, &component);

        assert_eq!(index.loader.level_numbers(Difficulty::Easy), vec![1]);
        assert_eq!(index.loader.level_count(Difficulty::Hard), 0);
        assert_eq!(index.rejected.len(), 3);
        assert!(index.rejected.iter().all(|(_, e)| matches!(e, PluginError::MalformedLevel { .. })));
    }

    #[test]
    fn test_index_levels_reports_duplicate_numbers() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        write_level(root, "easy", "01.json", "S\nP");
        write_level(root, "easy", "1.json", "T K3\nP P");

        let manifest = Manifest::new("pipes", "Pipes", vec![Difficulty::Easy]);
        let index = index_levels(root, &manifest, &flow_component());

        assert_eq!(index.loader.level_numbers(Difficulty::Easy), vec![1]);
        assert_eq!(index.loader.load(Difficulty::Easy, 1).unwrap().layout, "S\nP");
        assert_eq!(index.rejected.len(), 1);
        let (path, err) = &index.rejected[0];
        assert!(path.ends_with("1.json"));
        assert!(matches!(err, PluginError::MalformedLevel { .. }));
    }

    #[test]
    fn test_index_levels_without_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::new("pipes", "Pipes", vec![Difficulty::Easy]);
        let index = index_levels(temp_dir.path(), &manifest, &flow_component());
        assert_eq!(index.loader.total_levels(), 0);
        assert!(index.rejected.is_empty());
    }
}
