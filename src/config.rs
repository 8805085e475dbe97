//! World generation configuration
//!
//! Key=value config files with `//` comments for the generation parameters,
//! and the spawn-probability tables that drive tile selection. Parsers warn
//! and fall back on bad values instead of failing the whole load; only an
//! unreadable file is an error.

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Strip a `//` comment and surrounding whitespace from a config line.
/// Returns `None` when nothing remains.
fn clean_line(line: &str) -> Option<&str> {
    let line = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let line = line.trim();
    if line.is_empty() { None } else { Some(line) }
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

// =============================================================================
// WORLD GENERATION CONFIG
// =============================================================================

/// Parameters controlling world synthesis and neighbor counting.
#[derive(Debug, Clone)]
pub struct WorldGenConfig {
    /// Playable width, without the border ring.
    pub width: usize,
    /// Playable height, without the border ring.
    pub height: usize,
    /// Noise seed. Replaced by a random draw at load time when
    /// `use_random_seed` is set.
    pub seed: u32,
    /// Draw a fresh seed on every load instead of using `seed`.
    pub use_random_seed: bool,
    /// Base frequency handed to the noise sampler.
    pub noise_frequency: f64,
    /// Neighborhood radius: 0 selects the 4-connected neighborhood, 1 and up
    /// select the full square neighborhood of that radius.
    pub neighbor_radius: usize,
    /// Symbol of the tile written into the border ring.
    pub border_symbol: char,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 40,
            seed: 1337,
            use_random_seed: true,
            noise_frequency: 0.05,
            neighbor_radius: 3,
            border_symbol: '#',
        }
    }
}

impl WorldGenConfig {
    /// Parse key=value lines over the defaults. Unknown keys and unparsable
    /// values warn and leave the default in place.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines().filter_map(clean_line) {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "Width" | "WorldWidth" => config.apply_usize(key, value, |c, v| c.width = v),
                "Height" | "WorldHeight" => config.apply_usize(key, value, |c, v| c.height = v),
                "Seed" | "WorldSeed" => match value.parse::<i64>() {
                    Ok(v) => config.seed = v as u32,
                    Err(_) => warn!(key, value, "ignoring unparsable seed"),
                },
                "UseRandomSeed" => config.use_random_seed = value == "true",
                "NoiseFrequency" => match value.parse::<f64>() {
                    Ok(v) => config.noise_frequency = v,
                    Err(_) => warn!(key, value, "ignoring unparsable frequency"),
                },
                "NeighborRadius" => config.apply_usize(key, value, |c, v| c.neighbor_radius = v),
                "BorderTile" => match value.chars().next() {
                    Some(c) if value.chars().count() == 1 => config.border_symbol = c,
                    _ => warn!(key, value, "border tile must be a single symbol"),
                },
                _ => warn!(key, "unknown world config key"),
            }
        }
        config
    }

    fn apply_usize(&mut self, key: &str, value: &str, apply: impl FnOnce(&mut Self, usize)) {
        match value.parse::<usize>() {
            Ok(v) => apply(self, v),
            Err(_) => warn!(key, value, "ignoring unparsable value"),
        }
    }

    /// Load the config and resolve the effective seed: random-seed worlds
    /// draw a fresh seed here so the world can be regenerated from the
    /// logged value.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::parse(&read_config_file(path)?);
        if config.use_random_seed {
            config.seed = rand::random();
            info!(seed = config.seed, "using random world seed");
        }
        info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            frequency = config.noise_frequency,
            "loaded world generation config"
        );
        Ok(config)
    }
}

// =============================================================================
// SPAWN RULES
// =============================================================================

/// Spawn probabilities for one tile symbol across the three elevation zones
/// (low, mid, high).
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRule {
    pub zone_probabilities: [f32; 3],
}

impl SpawnRule {
    pub fn new(low: f32, mid: f32, high: f32) -> Self {
        Self {
            zone_probabilities: [low, mid, high],
        }
    }

    pub fn probability_for_zone(&self, zone: usize) -> f32 {
        self.zone_probabilities.get(zone).copied().unwrap_or(0.0)
    }
}

/// Probability used for zones a rule line leaves unspecified.
const FALLBACK_PROBABILITY: f32 = 0.1;

/// Spawn rules keyed by tile symbol, in symbol order.
#[derive(Debug, Clone, Default)]
pub struct SpawnTable {
    rules: BTreeMap<char, SpawnRule>,
}

impl SpawnTable {
    pub fn from_rules(rules: impl IntoIterator<Item = (char, SpawnRule)>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Parse `symbol=low:mid:high` lines. Missing probabilities pad with
    /// 0.1, unparsable ones warn and pad the same way.
    pub fn parse(text: &str) -> Self {
        let mut rules = BTreeMap::new();
        for line in text.lines().filter_map(clean_line) {
            let Some((symbol_text, prob_text)) = line.split_once('=') else {
                continue;
            };
            let symbol_text = symbol_text.trim();
            if symbol_text.chars().count() != 1 {
                warn!(symbol = symbol_text, "spawn tile must be a single symbol");
                continue;
            }
            let symbol = symbol_text.chars().next().unwrap();

            // slots not covered by the line keep the fallback
            let mut probabilities = [FALLBACK_PROBABILITY; 3];
            for (slot, token) in prob_text.split(':').take(3).enumerate() {
                match token.trim().parse::<f32>() {
                    Ok(p) => probabilities[slot] = p,
                    Err(_) => {
                        warn!(symbol = %symbol, token, "unparsable spawn probability");
                    }
                }
            }
            rules.insert(symbol, SpawnRule { zone_probabilities: probabilities });
        }
        Self { rules }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let table = Self::parse(&read_config_file(path)?);
        info!(path = %path.display(), rules = table.len(), "loaded spawn table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule(&self, symbol: char) -> Option<&SpawnRule> {
        self.rules.get(&symbol)
    }

    /// Iterate rules in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &SpawnRule)> {
        self.rules.iter().map(|(symbol, rule)| (*symbol, rule))
    }
}
