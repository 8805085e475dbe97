//! Cellular automaton stepping
//!
//! One generation tick: every interior cell is examined in row-major order
//! against the pre-step grid, applying death, then survival, then birth
//! rules. The next grid is built in full before replacing the old one, so a
//! cell's transition only ever depends on last generation's neighbors.

use tracing::debug;

use crate::grid::{WorldGrid, BACKGROUND_TILE};
use crate::neighborhood::count_neighbors;
use crate::rules::RuleSet;
use crate::tiles::TileCatalog;

/// Cell transitions of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub births: usize,
    pub deaths: usize,
}

/// Advance the grid by one generation.
///
/// Death is checked first and suppresses the survival check; survival
/// failing empties the cell; cells that were empty before the tick take the
/// first rule entry (in symbol order) whose birth rule fires. Everything
/// else copies over unchanged, the border included.
pub fn step_automaton(
    grid: &mut WorldGrid,
    catalog: &TileCatalog,
    rules: &RuleSet,
    radius: usize,
) -> StepStats {
    let previous = grid.clone();
    let mut next = previous.clone();
    let mut stats = StepStats::default();

    for (x, y) in previous.interior_coords() {
        let current = previous.get(x, y);
        let counts = count_neighbors(&previous, catalog, x, y, radius);

        if current != BACKGROUND_TILE {
            let symbol = catalog.symbol_for_id(current);
            let Some(entry) = rules.rule(symbol) else {
                continue;
            };
            if let Some(death) = &entry.death {
                if death.evaluate(&counts) {
                    next.set(x, y, BACKGROUND_TILE);
                    stats.deaths += 1;
                    continue;
                }
            }
            if let Some(survival) = &entry.survival {
                if !survival.evaluate(&counts) {
                    next.set(x, y, BACKGROUND_TILE);
                    stats.deaths += 1;
                }
            }
        } else {
            for (symbol, entry) in rules.entries() {
                let Some(birth) = &entry.birth else {
                    continue;
                };
                if birth.evaluate(&counts) {
                    match catalog.id_for_symbol(symbol) {
                        Some(id) => {
                            next.set(x, y, id);
                            stats.births += 1;
                        }
                        None => {
                            debug!(symbol = %symbol, x, y, "birth rule fired for a symbol with no tile id");
                        }
                    }
                    // first matching birth rule wins the cell
                    break;
                }
            }
        }
    }

    *grid = next;
    stats
}
