//! Report formatting for the catalog, scan diagnostics and feed plans

use prettytable::{format, Cell, Row, Table};

use crate::feed::FeedItem;
use crate::plugin::{DiagnosticLevel, GameDescriptor, Registry, ScanDiagnostic};

/// Format a compact table with headers and rows using prettytable-rs clean format
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(headers.iter().map(|header| Cell::new(header)).collect()));
    for row in rows {
        table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
    }

    // Two-space indent for every line
    table
        .to_string()
        .lines()
        .map(|line| format!("  {}\n", line))
        .collect()
}

/// One row per registered game, in registration order
pub fn format_catalog(registry: &Registry) -> String {
    let rows: Vec<Vec<String>> = registry
        .list()
        .iter()
        .map(|descriptor| {
            vec![
                descriptor.id.clone(),
                descriptor.manifest.title.clone(),
                descriptor.component.entry().to_string(),
                difficulty_summary(descriptor),
                descriptor.total_levels().to_string(),
            ]
        })
        .collect();
    format_compact_table(&["ID", "TITLE", "ENTRY", "DIFFICULTIES", "LEVELS"], &rows)
}

/// Manifest details and per-difficulty level numbers of one game
pub fn format_game_info(descriptor: &GameDescriptor) -> String {
    let manifest = &descriptor.manifest;
    let mut out = format!("{} ({})\n", manifest.title, manifest.id);
    if let Some(description) = &manifest.description {
        out.push_str(&format!("  {}\n", description));
    }
    let optional = [("Version", &manifest.version), ("Author", &manifest.author)];
    for (label, value) in optional {
        if let Some(value) = value {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }
    out.push_str(&format!("  Entry: {}\n", descriptor.component.entry()));
    if let Some(folder) = &descriptor.folder {
        out.push_str(&format!("  Folder: {}\n", folder.display()));
    }

    let rows: Vec<Vec<String>> = manifest
        .difficulty_levels
        .iter()
        .map(|difficulty| {
            let numbers = descriptor.level_loader.level_numbers(*difficulty);
            let listed = if numbers.is_empty() {
                "-".to_string()
            } else {
                numbers.iter().map(u32::to_string).collect::<Vec<_>>().join(", ")
            };
            vec![difficulty.to_string(), numbers.len().to_string(), listed]
        })
        .collect();
    out.push('\n');
    out.push_str(&format_compact_table(&["DIFFICULTY", "COUNT", "LEVELS"], &rows));
    out
}

/// Feed plan, one row per item
pub fn format_feed_plan(items: &[FeedItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            vec![
                (position + 1).to_string(),
                item.game_id.clone(),
                item.level.difficulty.to_string(),
                item.level.level_number.to_string(),
                if item.game_state.is_some() { "restored" } else { "new" }.to_string(),
            ]
        })
        .collect();
    format_compact_table(&["#", "GAME", "DIFFICULTY", "LEVEL", "STATE"], &rows)
}

/// Scan and registration problems
pub fn format_diagnostics(diagnostics: &[ScanDiagnostic]) -> String {
    let rows: Vec<Vec<String>> = diagnostics
        .iter()
        .map(|diagnostic| {
            let level = match diagnostic.level {
                DiagnosticLevel::Excluded => "excluded",
                DiagnosticLevel::Warning => "warning",
            };
            vec![level.to_string(), diagnostic.path.display().to_string(), diagnostic.error.to_string()]
        })
        .collect();
    format_compact_table(&["LEVEL", "PATH", "PROBLEM"], &rows)
}

fn difficulty_summary(descriptor: &GameDescriptor) -> String {
    descriptor
        .manifest
        .difficulty_levels
        .iter()
        .map(|difficulty| format!("{}:{}", difficulty, descriptor.level_loader.level_count(*difficulty)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::tests::mock_components::mock_descriptor;
    use crate::plugin::{Difficulty, PluginError};
    use std::path::PathBuf;

    #[test]
    fn test_empty_rows_format_to_nothing() {
        assert_eq!(format_compact_table(&["A"], &[]), "");
    }

    #[test]
    fn test_compact_table_is_indented() {
        let table = format_compact_table(&["ID", "LEVELS"], &[vec!["pipes".to_string(), "3".to_string()]]);
        assert!(table.lines().all(|line| line.starts_with("  ")));
        assert!(table.contains("pipes"));
    }

    #[test]
    fn test_catalog_lists_games_in_order() {
        let mut registry = Registry::new();
        registry.register("zeta", mock_descriptor("zeta", &[Difficulty::Easy], 2)).unwrap();
        registry.register("alpha", mock_descriptor("alpha", &[Difficulty::Easy, Difficulty::Hard], 1)).unwrap();

        let table = format_catalog(&registry);
        let zeta = table.find("zeta").unwrap();
        let alpha = table.find("alpha").unwrap();
        assert!(zeta < alpha);
        assert!(table.contains("easy:1 hard:1"));
    }

    #[test]
    fn test_game_info_lists_levels() {
        let descriptor = mock_descriptor("alpha", &[Difficulty::Easy, Difficulty::Medium], 3);
        let info = format_game_info(&descriptor);
        assert!(info.starts_with("ALPHA (alpha)"));
        assert!(info.contains("Entry: tap"));
        assert!(info.contains("1, 2, 3"));
    }

    #[test]
    fn test_diagnostics_table() {
        let diagnostics = vec![ScanDiagnostic {
            level: DiagnosticLevel::Excluded,
            path: PathBuf::from("games/broken"),
            error: PluginError::manifest_missing("games/broken"),
        }];
        let table = format_diagnostics(&diagnostics);
        assert!(table.contains("excluded"));
        assert!(table.contains("Manifest missing"));
    }
}
