//! Tile catalog
//!
//! Owns the mapping between numeric tile ids and their display symbols,
//! loaded from a JSON tile list. Lookups never fail: unknown ids resolve to
//! the default symbol and unknown symbols resolve to `None`, so callers can
//! degrade instead of erroring mid-generation.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Symbol reported for ids the catalog does not know.
pub const DEFAULT_SYMBOL: char = '.';

fn default_character() -> char {
    '?'
}

/// One tile kind: numeric id, human-readable name and display symbol, plus
/// gameplay flags the world core does not interpret.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileType {
    pub id: i32,
    pub name: String,
    #[serde(default = "default_character")]
    pub character: char,
    #[serde(default)]
    pub color: i32,
    #[serde(default)]
    pub is_passable: bool,
    #[serde(default)]
    pub is_destructible: bool,
    #[serde(default)]
    pub damage: i32,
}

impl TileType {
    pub fn new(id: i32, name: &str, character: char, color: i32, passable: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            character,
            color,
            is_passable: passable,
            is_destructible: false,
            damage: 0,
        }
    }
}

/// Registry of tile kinds keyed by id. Iteration order is id order, which
/// keeps symbol lookups deterministic when two tiles share a symbol.
#[derive(Debug, Clone)]
pub struct TileCatalog {
    tiles: BTreeMap<i32, TileType>,
}

impl TileCatalog {
    /// Build a catalog from explicit tile records.
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileType>) -> Self {
        let mut map = BTreeMap::new();
        for tile in tiles {
            if tile.id < 0 || tile.name.is_empty() {
                warn!(id = tile.id, name = %tile.name, "skipping invalid tile record");
                continue;
            }
            map.insert(tile.id, tile);
        }
        Self { tiles: map }
    }

    /// The built-in tile set used when no tile file is available.
    pub fn default_tiles() -> Self {
        Self::from_tiles([
            TileType::new(0, "air", ' ', 0, true),
            TileType::new(1, "grass", '.', 10, true),
            TileType::new(2, "stone_wall", '#', 8, false),
            TileType::new(3, "water", '~', 9, false),
            TileType::new(4, "lava", '~', 4, true),
            TileType::new(5, "tree", 'T', 2, false),
            TileType::new(6, "sand", ',', 14, true),
            TileType::new(7, "mountain", '^', 7, false),
        ])
    }

    /// Load the catalog from a JSON array of tile records. A missing or
    /// unreadable file falls back to the built-in tiles with a warning.
    pub fn load_from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "tile file not readable, using default tiles");
                return Self::default_tiles();
            }
        };
        match Self::parse(&text) {
            Ok(catalog) if !catalog.is_empty() => {
                info!(path = %path.display(), tiles = catalog.len(), "loaded tile catalog");
                catalog
            }
            Ok(_) => {
                warn!(path = %path.display(), "tile file contains no tiles, using default tiles");
                Self::default_tiles()
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "tile file is not valid JSON, using default tiles");
                Self::default_tiles()
            }
        }
    }

    /// Parse a JSON array of tile records.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let tiles: Vec<TileType> = serde_json::from_str(text)?;
        Ok(Self::from_tiles(tiles))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile record for an id, if registered.
    pub fn tile(&self, id: i32) -> Option<&TileType> {
        self.tiles.get(&id)
    }

    /// Display symbol for an id; unknown ids get [`DEFAULT_SYMBOL`].
    pub fn symbol_for_id(&self, id: i32) -> char {
        self.tiles
            .get(&id)
            .map(|tile| tile.character)
            .unwrap_or(DEFAULT_SYMBOL)
    }

    /// First id (in id order) whose tile displays the given symbol.
    pub fn id_for_symbol(&self, symbol: char) -> Option<i32> {
        self.tiles
            .values()
            .find(|tile| tile.character == symbol)
            .map(|tile| tile.id)
    }

}
