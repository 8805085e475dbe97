//! World container
//!
//! Owns the grid, the tile catalog, the loaded configs and the active
//! automaton rule set, and drives the generation pipeline: synthesize the
//! interior, write the border ring, then smooth biome boundaries. Stepping
//! the automaton is gated on the enabled flag and delegates to the stepper.

use std::sync::Arc;

use tracing::{info, warn};

use crate::automaton::{step_automaton, StepStats};
use crate::config::{SpawnTable, WorldGenConfig};
use crate::grid::{WorldGrid, BACKGROUND_TILE};
use crate::noise_field::NoiseField;
use crate::rules::RuleSet;
use crate::smoothing::{smooth_terrain, AnchorResolver, NameAnchorResolver, TerrainAnchors};
use crate::tiles::TileCatalog;
use crate::worldgen::synthesize_terrain;

pub struct World {
    grid: WorldGrid,
    catalog: TileCatalog,
    config: WorldGenConfig,
    spawn: SpawnTable,
    rules: Arc<RuleSet>,
    anchors: Option<TerrainAnchors>,
    automaton_enabled: bool,
}

impl World {
    /// Build an ungenerated world; the interior stays background until
    /// [`World::generate`] runs.
    pub fn new(
        catalog: TileCatalog,
        config: WorldGenConfig,
        spawn: SpawnTable,
        rules: RuleSet,
    ) -> Self {
        let border_tile = catalog
            .id_for_symbol(config.border_symbol)
            .unwrap_or(BACKGROUND_TILE);
        let grid = WorldGrid::new(config.width, config.height, border_tile);
        Self {
            grid,
            catalog,
            config,
            spawn,
            rules: Arc::new(rules),
            anchors: None,
            automaton_enabled: false,
        }
    }

    /// Run the full generation pipeline with the default anchor resolution.
    pub fn generate(&mut self) {
        self.generate_with(&NameAnchorResolver);
    }

    /// Run the full generation pipeline: noise synthesis, border, smoothing.
    pub fn generate_with(&mut self, resolver: &dyn AnchorResolver) {
        let noise = NoiseField::new(self.config.seed, self.config.noise_frequency);
        info!(
            width = self.config.width,
            height = self.config.height,
            seed = self.config.seed,
            frequency = self.config.noise_frequency,
            "generating world"
        );

        self.grid.fill_interior(BACKGROUND_TILE);
        if self.spawn.is_empty() {
            warn!("spawn table is empty, leaving the interior unset");
        } else {
            let placed = synthesize_terrain(&mut self.grid, &self.catalog, &self.spawn, &noise);
            info!(placed, "terrain synthesis complete");
        }

        self.grid.create_border();

        self.anchors = resolver.resolve(&self.catalog, &self.spawn);
        match self.anchors {
            Some(anchors) => {
                let changed = smooth_terrain(
                    &mut self.grid,
                    &self.catalog,
                    &anchors,
                    self.config.neighbor_radius,
                );
                info!(changed, "terrain smoothing complete");
            }
            None => warn!("no terrain anchors resolvable, skipping smoothing"),
        }
    }

    /// Advance the automaton one generation. A disabled automaton or a rule
    /// set with no usable rules leaves the grid untouched.
    pub fn step(&mut self) -> StepStats {
        if !self.automaton_enabled {
            return StepStats::default();
        }
        if !self.rules.has_rules() {
            warn!("automaton enabled but the rule set is empty, skipping step");
            return StepStats::default();
        }
        let rules = Arc::clone(&self.rules);
        step_automaton(
            &mut self.grid,
            &self.catalog,
            &rules,
            self.config.neighbor_radius,
        )
    }

    /// Swap in a freshly loaded rule set. Whole-object replace: a step in
    /// progress never observes a half-updated table.
    pub fn reload_rules(&mut self, rules: RuleSet) {
        rules.log_summary();
        self.rules = Arc::new(rules);
    }

    /// Swap in a freshly loaded spawn table for the next generation run.
    pub fn reload_spawn(&mut self, spawn: SpawnTable) {
        self.spawn = spawn;
    }

    pub fn set_automaton_enabled(&mut self, enabled: bool) {
        self.automaton_enabled = enabled;
    }

    pub fn is_automaton_enabled(&self) -> bool {
        self.automaton_enabled
    }

    /// Tile id at interior coordinates.
    pub fn tile_at(&self, x: usize, y: usize) -> i32 {
        self.grid.tile_at(x, y)
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn anchors(&self) -> Option<TerrainAnchors> {
        self.anchors
    }

    /// The seed this world was (or will be) generated with.
    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    pub fn content_width(&self) -> usize {
        self.grid.content_width()
    }

    pub fn content_height(&self) -> usize {
        self.grid.content_height()
    }

    pub fn total_width(&self) -> usize {
        self.grid.total_width()
    }

    pub fn total_height(&self) -> usize {
        self.grid.total_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnRule;

    fn test_config() -> WorldGenConfig {
        WorldGenConfig {
            width: 24,
            height: 16,
            seed: 1337,
            use_random_seed: false,
            noise_frequency: 0.05,
            neighbor_radius: 1,
            border_symbol: '#',
        }
    }

    fn spawn_table() -> SpawnTable {
        SpawnTable::from_rules([
            ('~', SpawnRule::new(0.8, 0.1, 0.0)),
            ('.', SpawnRule::new(0.2, 0.7, 0.2)),
            ('^', SpawnRule::new(0.0, 0.1, 0.8)),
        ])
    }

    fn generated_world() -> World {
        let mut world = World::new(
            TileCatalog::default_tiles(),
            test_config(),
            spawn_table(),
            RuleSet::default(),
        );
        world.generate();
        world
    }

    fn interior_tiles(world: &World) -> Vec<i32> {
        (0..world.content_height())
            .flat_map(|y| (0..world.content_width()).map(move |x| (x, y)))
            .map(|(x, y)| world.tile_at(x, y))
            .collect()
    }

    #[test]
    fn test_generation_is_reproducible() {
        let first = generated_world();
        let second = generated_world();
        assert_eq!(interior_tiles(&first), interior_tiles(&second));
    }

    #[test]
    fn test_generated_border_is_wall() {
        let world = generated_world();
        let grid = world.grid();
        for x in 0..grid.total_width() {
            assert_eq!(grid.get(x, 0), 2);
            assert_eq!(grid.get(x, grid.total_height() - 1), 2);
        }
        for y in 0..grid.total_height() {
            assert_eq!(grid.get(0, y), 2);
            assert_eq!(grid.get(grid.total_width() - 1, y), 2);
        }
    }

    #[test]
    fn test_anchors_resolved_during_generation() {
        let world = generated_world();
        let anchors = world.anchors().unwrap();
        assert_eq!(anchors.water, '~');
        assert_eq!(anchors.land, '.');
        assert_eq!(anchors.mountain, '^');
    }

    #[test]
    fn test_disabled_automaton_never_steps() {
        let mut world = generated_world();
        world.reload_rules(RuleSet::parse("~\ndeath=true\n"));
        let before = interior_tiles(&world);
        let stats = world.step();
        assert_eq!(stats, StepStats::default());
        assert_eq!(interior_tiles(&world), before);
    }

    #[test]
    fn test_empty_rule_set_skips_stepping() {
        let mut world = generated_world();
        world.set_automaton_enabled(true);
        assert_eq!(world.step(), StepStats::default());
    }

    #[test]
    fn test_enabled_automaton_applies_rules() {
        // a single-symbol spawn table fills the whole interior with water
        let mut world = World::new(
            TileCatalog::default_tiles(),
            test_config(),
            SpawnTable::from_rules([('~', SpawnRule::new(1.0, 1.0, 1.0))]),
            RuleSet::parse("~\ndeath=true\n"),
        );
        world.generate();
        world.set_automaton_enabled(true);
        let stats = world.step();
        assert_eq!(stats.deaths, world.content_width() * world.content_height());
        assert!(!interior_tiles(&world).contains(&3));
    }

    #[test]
    fn test_injected_anchor_strategy_overrides_resolution() {
        use crate::smoothing::FixedAnchors;

        let mut world = World::new(
            TileCatalog::default_tiles(),
            test_config(),
            spawn_table(),
            RuleSet::default(),
        );
        let swapped = TerrainAnchors {
            water: '.',
            land: '~',
            mountain: '^',
        };
        world.generate_with(&FixedAnchors(swapped));
        assert_eq!(world.anchors(), Some(swapped));
    }

    #[test]
    fn test_reloaded_spawn_table_drives_the_next_generation() {
        let mut world = generated_world();
        world.reload_spawn(SpawnTable::from_rules([('^', SpawnRule::new(1.0, 1.0, 1.0))]));
        world.generate();
        assert!(interior_tiles(&world).iter().all(|&id| id == 7));
    }

    #[test]
    fn test_reload_replaces_rules_wholesale() {
        let mut world = generated_world();
        world.reload_rules(RuleSet::parse("#\nbirth=true\n"));
        assert!(world.rules().rule('#').is_some());
        world.reload_rules(RuleSet::parse("~\ndeath=true\n"));
        assert!(world.rules().rule('#').is_none());
        assert!(world.rules().rule('~').is_some());
    }
}
