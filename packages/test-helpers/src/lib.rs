//! Testing helpers for the Torrust swarm registry.
pub mod configuration;
pub mod random;
