//! Chaotic symbol-world library
//!
//! Procedural tile-world synthesis from layered noise, plus a cellular
//! automaton driven by textual transition rules. Re-exports modules for use
//! by binaries and tools.

pub mod automaton;
pub mod config;
pub mod grid;
pub mod neighborhood;
pub mod noise_field;
pub mod rule_expr;
pub mod rules;
pub mod smoothing;
pub mod tiles;
pub mod world;
pub mod worldgen;
