//! # Gloaming
//!
//! Light-phase and exposure calculations for photographers.
//!
//! The library is split so the math can be tested without the CLI:
//!
//! - **Solar geometry**: [`geo`] computes solar elevation, finds elevation
//!   crossings and adapts sunrise/sunset/twilight inputs
//! - **Light phases**: [`phase`] builds the day's blue hour / golden hour
//!   timeline and resolves where an instant falls on it
//! - **Exposure**: [`exposure`] solves equivalent exposures over discrete camera
//!   values, plus ND filters, reference scenes and depth of field
//! - **Reciprocity**: [`reciprocity`] corrects long exposures per film stock
//! - **Infrastructure**: [`config`], [`time`], [`args`], [`commands`] and the
//!   structured logger in [`common`]

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod commands;
pub mod config;
pub mod exposure;
pub mod geo;
pub mod phase;
pub mod reciprocity;
pub mod time;
