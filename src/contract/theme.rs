//! Theme Tokens
//!
//! Read-only presentation lookup injected at the render boundary. It can
//! shape how a grid is drawn but never what the game data holds.

use std::collections::HashMap;

/// Immutable set of visual tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeTokens {
    tokens: HashMap<String, String>,
}

impl ThemeTokens {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// Token value, or the fallback when the theme does not define it
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Copy of this theme with some tokens replaced
    pub fn overridden<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut tokens = self.tokens.clone();
        tokens.extend(overrides.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self { tokens }
    }
}

impl Default for ThemeTokens {
    fn default() -> Self {
        let tokens = [
            ("color.watered", "cyan"),
            ("color.dry", "white"),
            ("color.pool", "blue"),
            ("glyph.pool", "O"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { tokens }
    }
}
