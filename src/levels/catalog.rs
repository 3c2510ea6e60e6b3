//! Level definitions and the catalog that resolves level numbers.
//!
//! Catalogs built in code assert their invariants; catalogs read from data
//! are checked while deserializing and rejected with a [`ConfigError`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Symbols used by the built-in levels, in pair order.
const STANDARD_SYMBOLS: [&str; 15] = [
    "Heart", "Star", "Circle", "Square", "Triangle", "Diamond", "Hexagon", "Pentagon", "Octagon",
    "Plus", "Minus", "X", "Sun", "Moon", "Cloud",
];

/// Static configuration of one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    /// Level number this entry describes (1-based).
    pub level: u32,
    pub grid_rows: usize,
    pub grid_cols: usize,
    /// Pairs dealt per attempt. The deck holds twice as many cards.
    #[serde(deserialize_with = "at_least_one_pair")]
    pub pair_count: usize,
    /// Symbols labelling the pairs, cycled if shorter than `pair_count`.
    #[serde(deserialize_with = "non_empty_symbols")]
    pub symbols: Vec<String>,
}

impl LevelDefinition {
    /// Create a level definition.
    ///
    /// # Panics
    ///
    /// Panics if `pair_count` is zero or no symbols are given.
    pub fn new<S: Into<String>>(
        level: u32,
        grid_rows: usize,
        grid_cols: usize,
        pair_count: usize,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        assert!(pair_count > 0, "Level must have at least 1 pair");
        assert!(!symbols.is_empty(), "Level must have at least 1 symbol");

        Self {
            level,
            grid_rows,
            grid_cols,
            pair_count,
            symbols,
        }
    }

    fn is_dealable(&self) -> bool {
        self.pair_count > 0 && !self.symbols.is_empty()
    }

    /// Number of cards dealt for this level.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.pair_count * 2
    }

    /// Symbol for the pair at `index`.
    #[must_use]
    pub fn symbol_for_pair(&self, index: usize) -> &str {
        &self.symbols[index % self.symbols.len()]
    }
}

/// Ordered table of level definitions.
///
/// Lookups never fail: numbers below the first entry resolve to it, numbers
/// past the end resolve to the last one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCatalog {
    #[serde(deserialize_with = "non_empty_levels")]
    levels: Vec<LevelDefinition>,
}

fn at_least_one_pair<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    match usize::deserialize(deserializer)? {
        0 => Err(D::Error::custom(ConfigError::NoPairs)),
        pairs => Ok(pairs),
    }
}

fn non_empty_symbols<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<String>, D::Error> {
    let symbols = Vec::<String>::deserialize(deserializer)?;
    if symbols.is_empty() {
        return Err(D::Error::custom(ConfigError::NoSymbols));
    }
    Ok(symbols)
}

fn non_empty_levels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<LevelDefinition>, D::Error> {
    let levels = Vec::<LevelDefinition>::deserialize(deserializer)?;
    if levels.is_empty() {
        return Err(D::Error::custom(ConfigError::EmptyCatalog));
    }
    Ok(levels)
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl LevelCatalog {
    /// Create a catalog from definitions ordered by level.
    ///
    /// # Panics
    ///
    /// Panics if `levels` is empty or a level has no pairs or no symbols.
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        assert!(!levels.is_empty(), "Catalog must define at least 1 level");
        assert!(
            levels.iter().all(LevelDefinition::is_dealable),
            "Every level needs at least 1 pair and 1 symbol"
        );
        Self { levels }
    }

    /// The four levels the game ships with.
    #[must_use]
    pub fn standard() -> Self {
        let level = |n: u32, rows: usize, cols: usize, pairs: usize| {
            LevelDefinition::new(n, rows, cols, pairs, STANDARD_SYMBOLS[..pairs].iter().copied())
        };

        Self::new(vec![
            level(1, 3, 4, 6),
            level(2, 4, 4, 8),
            level(3, 4, 6, 12),
            level(4, 5, 6, 15),
        ])
    }

    /// Resolve a level number to its definition.
    #[must_use]
    pub fn get(&self, level: u32) -> &LevelDefinition {
        let index = (level.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[index]
    }

    /// Is `level` defined without falling back?
    #[must_use]
    pub fn contains(&self, level: u32) -> bool {
        level >= 1 && (level as usize) <= self.levels.len()
    }

    /// Number of defined levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; a catalog holds at least one level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate over the definitions in level order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }
}
