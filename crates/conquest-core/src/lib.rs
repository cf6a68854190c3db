//! Core types and definitions for the conquest combat simulator.
//!
//! This crate defines the vocabulary shared across the other crates:
//! geometry, entity components, events, the request/response contract,
//! and tuning constants. It has no dependency on the engine itself.

pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
