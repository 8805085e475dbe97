//! Neighbor counting
//!
//! Builds the per-cell symbol histogram the automaton and the smoothing pass
//! evaluate rules against. Radius 0 selects the 4-connected cross; any larger
//! radius selects the full square neighborhood within that Chebyshev
//! distance, center excluded. Border cells never contribute a count, so edge
//! cells are not biased toward the border tile.

use std::collections::BTreeMap;

use crate::grid::WorldGrid;
use crate::tiles::TileCatalog;

/// Symbol → occurrence count for one cell's neighborhood. Rebuilt per cell,
/// per tick.
pub type NeighborCounts = BTreeMap<char, usize>;

/// Offsets of the 4-connected neighborhood.
const CROSS_OFFSETS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Count neighbor symbols around a full-map cell.
///
/// `(x, y)` are full-map coordinates; neighbors that land on the border ring
/// or outside the grid are skipped. Neighbor ids resolve to symbols through
/// the catalog, so unknown ids are counted under the default symbol.
pub fn count_neighbors(
    grid: &WorldGrid,
    catalog: &TileCatalog,
    x: usize,
    y: usize,
    radius: usize,
) -> NeighborCounts {
    let mut counts = NeighborCounts::new();
    let mut tally = |dx: i32, dy: i32| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 {
            return;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if !grid.is_interior(nx, ny) {
            return;
        }
        let symbol = catalog.symbol_for_id(grid.get(nx, ny));
        *counts.entry(symbol).or_insert(0) += 1;
    };

    if radius == 0 {
        for (dx, dy) in CROSS_OFFSETS {
            tally(dx, dy);
        }
    } else {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                tally(dx, dy);
            }
        }
    }
    counts
}
