//! Mock Components for Testing
//!
//! A tap-counting game whose levels are a target count, plus helpers that
//! lay out cartridge folders on disk.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::contract::{GameLogic, GameResult, LevelContext, LogicComponent, Reduction, ThemeTokens};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::levels::{LevelPayload, StaticLevelLoader};
use crate::plugin::manifest::{Difficulty, Manifest};
use crate::plugin::traits::{ComponentCatalog, GameDescriptor};

/// Game data of the tap game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taps {
    pub count: u32,
    pub target: u32,
}

/// Tap until the target is reached; a level layout is the target
pub struct TapLogic;

impl GameLogic for TapLogic {
    type Data = Taps;
    type Interaction = Value;

    fn from_level(&self, _context: &LevelContext<'_>, level: &LevelPayload) -> PluginResult<Taps> {
        let target = level
            .layout
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|target| *target > 0)
            .ok_or_else(|| PluginError::invalid_game_data(format!("bad target '{}'", level.layout)))?;
        Ok(Taps { count: 0, target })
    }

    fn placeholder(&self) -> Taps {
        Taps { count: 0, target: 0 }
    }

    fn reduce(&self, data: &Taps, _interaction: &Value) -> Reduction<Taps> {
        if data.target == 0 {
            return Reduction::Rejected("no level".to_string());
        }
        let next = Taps { count: data.count + 1, target: data.target };
        if next.count >= next.target {
            Reduction::Finished(next, GameResult::Won)
        } else {
            Reduction::Continue(next)
        }
    }

    fn render_text(&self, data: &Taps, _theme: &ThemeTokens) -> String {
        format!("{}/{}", data.count, data.target)
    }
}

/// Tap game component exported under `entry`
pub fn tap_component(entry: &str) -> LogicComponent<TapLogic> {
    LogicComponent::new(entry, TapLogic)
}

/// Catalog exporting the tap game as `tap`
pub fn mock_catalog() -> ComponentCatalog {
    ComponentCatalog::new().with_component(tap_component("tap"))
}

/// In-memory descriptor with `levels` levels per declared difficulty
pub fn mock_descriptor(id: &str, difficulties: &[Difficulty], levels: u32) -> GameDescriptor {
    let manifest = Manifest::new(id, id.to_uppercase(), difficulties.to_vec()).with_entry("tap");
    let mut loader = StaticLevelLoader::new(id);
    for difficulty in difficulties {
        for n in 1..=levels {
            loader.insert(*difficulty, n, LevelPayload::new(n.to_string()));
        }
    }
    GameDescriptor::new(manifest, Arc::new(tap_component("tap")), Arc::new(loader))
}

/// Write a JSON manifest into `root/folder`
pub fn write_manifest(root: &Path, folder: &str, manifest: &Value) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("manifest.json"), serde_json::to_string_pretty(manifest).unwrap()).unwrap();
}

/// Write a level file into `root/folder/levels/tier/n.json`
pub fn write_level(root: &Path, folder: &str, tier: &str, n: u32, layout: &str) {
    let dir = root.join(folder).join("levels").join(tier);
    fs::create_dir_all(&dir).unwrap();
    let body = serde_json::json!({ "layout": layout }).to_string();
    fs::write(dir.join(format!("{}.json", n)), body).unwrap();
}
