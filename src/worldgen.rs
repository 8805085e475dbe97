//! Terrain synthesis
//!
//! Classifies every interior cell into an elevation zone from blended noise
//! octaves, then picks a tile for the zone by weighted probabilistic
//! selection. The selection weights are modulated by a low-frequency noise
//! sample at the same coordinates, so neighboring cells get correlated
//! variation instead of independent rolls.

use tracing::debug;

use crate::config::SpawnTable;
use crate::grid::WorldGrid;
use crate::noise_field::NoiseField;
use crate::tiles::TileCatalog;

// =============================================================================
// TERRAIN CONSTANTS
// =============================================================================

// Octave blend weights: broad landmass shape, ridge lines, fine detail.
const BASE_WEIGHT: f64 = 0.4;
const RIDGE_WEIGHT: f64 = 0.4;
const DETAIL_WEIGHT: f64 = 0.2;

// Mild power curve applied to the blended height to keep midlands from
// eroding away.
const HEIGHT_CURVE: f64 = 1.1;

// Frequency multipliers and phase offsets per octave, relative to the
// configured base frequency.
const RIDGE_FREQUENCY_MULT: f64 = 2.0;
const RIDGE_OFFSET: f64 = 1000.0;
const DETAIL_FREQUENCY_MULT: f64 = 4.0;
const DETAIL_OFFSET: f64 = 2000.0;

// The selection octave runs below the base frequency so tile variation
// drifts across whole regions.
const SELECT_FREQUENCY_MULT: f64 = 0.5;
const SELECT_OFFSET: f64 = 500.0;

// Zone thresholds over the blended height.
const LOW_ZONE_MAX: f64 = 0.25;
const MID_ZONE_MAX: f64 = 0.7;

// =============================================================================
// HEIGHT AND ZONES
// =============================================================================

/// Blended height at a cell, in [0, 1].
///
/// Three octaves: a base octave at the configured frequency, a ridge octave
/// (`1 - |noise|`, which peaks along the noise zero-crossings) at twice the
/// frequency, and a detail octave at four times the frequency.
pub fn height_at(noise: &NoiseField, x: f64, y: f64) -> f64 {
    let base = noise.sample01(x, y);
    let ridge = 1.0
        - noise
            .sample(
                x * RIDGE_FREQUENCY_MULT + RIDGE_OFFSET,
                y * RIDGE_FREQUENCY_MULT + RIDGE_OFFSET,
            )
            .abs();
    let detail = noise.sample01(
        x * DETAIL_FREQUENCY_MULT + DETAIL_OFFSET,
        y * DETAIL_FREQUENCY_MULT + DETAIL_OFFSET,
    );
    let blended = BASE_WEIGHT * base + RIDGE_WEIGHT * ridge + DETAIL_WEIGHT * detail;
    blended.powf(HEIGHT_CURVE)
}

/// Classify a height into zone 0 (low), 1 (mid) or 2 (high).
pub fn zone_for_height(height: f64) -> usize {
    if height < LOW_ZONE_MAX {
        0
    } else if height < MID_ZONE_MAX {
        1
    } else {
        2
    }
}

// =============================================================================
// WEIGHTED TILE SELECTION
// =============================================================================

/// Pick a tile symbol for a zone by weighted selection.
///
/// Every spawn rule contributes its zone probability scaled by
/// `0.9 + noise * 0.2`, where the noise is the low-frequency selection
/// octave at this cell. The same noise value, scaled by the summed weight,
/// acts as a cursor into the cumulative weight walk; the first symbol whose
/// cumulative weight reaches the cursor wins. There is deliberately no
/// normalization. A zero or exhausted total falls back to the symbol with
/// the highest base probability, first symbol winning ties.
pub fn select_tile_for_zone(
    zone: usize,
    spawn: &SpawnTable,
    noise: &NoiseField,
    x: f64,
    y: f64,
) -> Option<char> {
    let modulation = noise.sample01(
        x * SELECT_FREQUENCY_MULT + SELECT_OFFSET,
        y * SELECT_FREQUENCY_MULT + SELECT_OFFSET,
    ) as f32;

    let weights: Vec<(char, f32)> = spawn
        .iter()
        .map(|(symbol, rule)| {
            let weight = rule.probability_for_zone(zone) * (0.9 + modulation * 0.2);
            (symbol, weight)
        })
        .collect();
    let total: f32 = weights.iter().map(|(_, weight)| weight).sum();

    if total > 0.0 {
        let cursor = modulation * total;
        let mut cumulative = 0.0f32;
        for (symbol, weight) in &weights {
            cumulative += weight;
            if cumulative >= cursor {
                return Some(*symbol);
            }
        }
    }

    // zero or exhausted total: highest base probability wins
    let mut best: Option<(char, f32)> = None;
    for (symbol, rule) in spawn.iter() {
        let probability = rule.probability_for_zone(zone);
        match best {
            Some((_, best_probability)) if best_probability >= probability => {}
            _ => best = Some((symbol, probability)),
        }
    }
    best.map(|(symbol, _)| symbol)
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Populate the grid interior from noise and the spawn table. Returns the
/// number of cells that received a tile.
///
/// Cells whose chosen symbol has no catalog id are left at the background
/// tile; synthesis itself never fails.
pub fn synthesize_terrain(
    grid: &mut WorldGrid,
    catalog: &TileCatalog,
    spawn: &SpawnTable,
    noise: &NoiseField,
) -> usize {
    if spawn.is_empty() {
        return 0;
    }

    let mut placed = 0;
    for y in 1..=grid.content_height() {
        for x in 1..=grid.content_width() {
            let (fx, fy) = (x as f64, y as f64);
            let zone = zone_for_height(height_at(noise, fx, fy));
            let Some(symbol) = select_tile_for_zone(zone, spawn, noise, fx, fy) else {
                continue;
            };
            match catalog.id_for_symbol(symbol) {
                Some(id) => {
                    grid.set(x, y, id);
                    placed += 1;
                }
                None => {
                    debug!(symbol = %symbol, x, y, "chosen symbol has no tile id, leaving cell unset");
                }
            }
        }
    }
    placed
}
