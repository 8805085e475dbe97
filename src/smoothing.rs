//! Terrain smoothing
//!
//! A single post-pass over the freshly synthesized grid that reclassifies
//! cells sitting on awkward biome boundaries: lone peaks in open water,
//! puddles inside mountain ranges, and the like. The pass works on the three
//! anchor categories (a water-like, a land-like and a mountain-like symbol)
//! resolved per world, and reads only a snapshot of the pre-smoothing grid.

use tracing::debug;

use crate::config::SpawnTable;
use crate::grid::WorldGrid;
use crate::neighborhood::count_neighbors;
use crate::tiles::TileCatalog;

/// The three tile symbols anchoring the water/land/mountain categories for
/// one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainAnchors {
    pub water: char,
    pub land: char,
    pub mountain: char,
}

/// Strategy for resolving the anchor symbols of a world.
///
/// The default implementation guesses from tile names and probability
/// shapes; tests and exotic tile sets can substitute an explicit mapping.
pub trait AnchorResolver {
    fn resolve(&self, catalog: &TileCatalog, spawn: &SpawnTable) -> Option<TerrainAnchors>;
}

/// Fixed anchors, mostly useful for tests and hand-built worlds.
pub struct FixedAnchors(pub TerrainAnchors);

impl AnchorResolver for FixedAnchors {
    fn resolve(&self, _catalog: &TileCatalog, _spawn: &SpawnTable) -> Option<TerrainAnchors> {
        Some(self.0)
    }
}

/// Default resolver: tile-name substring match per category, then the
/// zone-probability shape, then the first spawn symbol as a last resort.
pub struct NameAnchorResolver;

impl NameAnchorResolver {
    fn anchor_for(
        &self,
        catalog: &TileCatalog,
        spawn: &SpawnTable,
        name_fragment: &str,
        zone: usize,
    ) -> Option<char> {
        // a spawn symbol whose tile name names the category
        let by_name = spawn.iter().find_map(|(symbol, _)| {
            let id = catalog.id_for_symbol(symbol)?;
            let tile = catalog.tile(id)?;
            tile.name.contains(name_fragment).then_some(symbol)
        });
        if by_name.is_some() {
            return by_name;
        }

        // a symbol whose probability for the category's zone strictly
        // dominates its other two zones
        let by_shape = spawn.iter().find_map(|(symbol, rule)| {
            let p = rule.zone_probabilities;
            let dominant = (0..3).all(|other| other == zone || p[zone] > p[other]);
            dominant.then_some(symbol)
        });
        if by_shape.is_some() {
            return by_shape;
        }

        // last resort: the first configured symbol
        let fallback = spawn.iter().next().map(|(symbol, _)| symbol);
        if let Some(symbol) = fallback {
            debug!(category = name_fragment, symbol = %symbol, "no anchor match, using first spawn symbol");
        }
        fallback
    }
}

impl AnchorResolver for NameAnchorResolver {
    fn resolve(&self, catalog: &TileCatalog, spawn: &SpawnTable) -> Option<TerrainAnchors> {
        Some(TerrainAnchors {
            water: self.anchor_for(catalog, spawn, "water", 0)?,
            land: self.anchor_for(catalog, spawn, "grass", 1)?,
            mountain: self.anchor_for(catalog, spawn, "mountain", 2)?,
        })
    }
}

// =============================================================================
// SMOOTHING PASS
// =============================================================================

/// Reclassify boundary cells between the anchor categories. Returns how many
/// cells changed; the grid is only rewritten when at least one did.
///
/// All decisions read a snapshot of the pre-smoothing grid, so a change to
/// one cell never feeds into its neighbors within the same pass.
pub fn smooth_terrain(
    grid: &mut WorldGrid,
    catalog: &TileCatalog,
    anchors: &TerrainAnchors,
    radius: usize,
) -> usize {
    let snapshot = grid.clone();
    let mut next = snapshot.clone();
    let mut changed = 0;

    for (x, y) in snapshot.interior_coords() {
        let symbol = catalog.symbol_for_id(snapshot.get(x, y));
        if symbol != anchors.water && symbol != anchors.land && symbol != anchors.mountain {
            continue;
        }

        let counts = count_neighbors(&snapshot, catalog, x, y, radius);
        let water = counts.get(&anchors.water).copied().unwrap_or(0);
        let land = counts.get(&anchors.land).copied().unwrap_or(0);
        let mountain = counts.get(&anchors.mountain).copied().unwrap_or(0);

        let replacement = if symbol == anchors.mountain {
            // a peak drowning in water becomes water
            if water >= 4 || (water >= 3 && land <= 2) {
                Some(anchors.water)
            } else {
                None
            }
        } else if symbol == anchors.water {
            if mountain >= 5 {
                Some(anchors.mountain)
            } else if land >= 6 && mountain <= 1 {
                Some(anchors.land)
            } else {
                None
            }
        } else if water >= 5 {
            Some(anchors.water)
        } else if mountain >= 4 && water <= 1 {
            Some(anchors.mountain)
        } else {
            None
        };

        if let Some(new_symbol) = replacement {
            if let Some(id) = catalog.id_for_symbol(new_symbol) {
                if id != snapshot.get(x, y) {
                    next.set(x, y, id);
                    changed += 1;
                }
            }
        }
    }

    if changed > 0 {
        *grid = next;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnRule;

    fn catalog() -> TileCatalog {
        TileCatalog::default_tiles()
    }

    fn spawn_table() -> SpawnTable {
        SpawnTable::from_rules([
            ('~', SpawnRule::new(0.8, 0.1, 0.0)),
            ('.', SpawnRule::new(0.2, 0.7, 0.2)),
            ('^', SpawnRule::new(0.0, 0.1, 0.8)),
        ])
    }

    fn anchors() -> TerrainAnchors {
        TerrainAnchors {
            water: '~',
            land: '.',
            mountain: '^',
        }
    }

    #[test]
    fn test_name_resolution_finds_default_anchors() {
        let resolved = NameAnchorResolver.resolve(&catalog(), &spawn_table()).unwrap();
        assert_eq!(resolved, anchors());
    }

    #[test]
    fn test_shape_fallback_when_names_do_not_match() {
        // tiles whose names carry no category hints
        let neutral = TileCatalog::from_tiles([
            crate::tiles::TileType::new(1, "alpha", 'a', 1, true),
            crate::tiles::TileType::new(2, "beta", 'b', 1, true),
            crate::tiles::TileType::new(3, "gamma", 'c', 1, true),
        ]);
        let spawn = SpawnTable::from_rules([
            ('a', SpawnRule::new(0.9, 0.1, 0.1)),
            ('b', SpawnRule::new(0.1, 0.9, 0.1)),
            ('c', SpawnRule::new(0.1, 0.1, 0.9)),
        ]);
        let resolved = NameAnchorResolver.resolve(&neutral, &spawn).unwrap();
        assert_eq!(resolved.water, 'a');
        assert_eq!(resolved.land, 'b');
        assert_eq!(resolved.mountain, 'c');
    }

    #[test]
    fn test_last_resort_uses_first_symbol() {
        let neutral = TileCatalog::from_tiles([crate::tiles::TileType::new(1, "thing", 'q', 1, true)]);
        // flat probabilities: no zone dominates
        let spawn = SpawnTable::from_rules([('q', SpawnRule::new(0.5, 0.5, 0.5))]);
        let resolved = NameAnchorResolver.resolve(&neutral, &spawn).unwrap();
        assert_eq!(resolved.water, 'q');
        assert_eq!(resolved.land, 'q');
        assert_eq!(resolved.mountain, 'q');
    }

    #[test]
    fn test_empty_spawn_table_resolves_nothing() {
        assert!(NameAnchorResolver.resolve(&catalog(), &SpawnTable::default()).is_none());
    }

    #[test]
    fn test_drowning_peak_becomes_water() {
        // water everywhere, one mountain in the middle
        let mut grid = WorldGrid::new(5, 5, 2);
        grid.fill_interior(3);
        grid.set(3, 3, 7);
        let changed = smooth_terrain(&mut grid, &catalog(), &anchors(), 1);
        assert_eq!(changed, 1);
        assert_eq!(grid.get(3, 3), 3);
    }

    #[test]
    fn test_puddle_in_mountains_becomes_mountain() {
        let mut grid = WorldGrid::new(5, 5, 2);
        grid.fill_interior(7);
        grid.set(3, 3, 3);
        let changed = smooth_terrain(&mut grid, &catalog(), &anchors(), 1);
        assert_eq!(changed, 1);
        assert_eq!(grid.get(3, 3), 7);
    }

    #[test]
    fn test_land_swallowed_by_water() {
        let mut grid = WorldGrid::new(5, 5, 2);
        grid.fill_interior(3);
        grid.set(3, 3, 1);
        let changed = smooth_terrain(&mut grid, &catalog(), &anchors(), 1);
        assert_eq!(changed, 1);
        assert_eq!(grid.get(3, 3), 3);
    }

    #[test]
    fn test_stable_terrain_is_untouched() {
        let mut grid = WorldGrid::new(6, 6, 2);
        // left half water, right half land: a straight coast is stable
        for y in 1..=6 {
            for x in 1..=6 {
                grid.set(x, y, if x <= 3 { 3 } else { 1 });
            }
        }
        let before = grid.clone();
        let changed = smooth_terrain(&mut grid, &catalog(), &anchors(), 1);
        assert_eq!(changed, 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_decisions_read_the_snapshot() {
        // two adjacent lone mountains in water: each sees the other as a
        // mountain neighbor in the snapshot, yet both still drown because
        // the thresholds count water only
        let mut grid = WorldGrid::new(6, 5, 2);
        grid.fill_interior(3);
        grid.set(3, 3, 7);
        grid.set(4, 3, 7);
        let changed = smooth_terrain(&mut grid, &catalog(), &anchors(), 1);
        assert_eq!(changed, 2);
        assert_eq!(grid.get(3, 3), 3);
        assert_eq!(grid.get(4, 3), 3);
    }
}
