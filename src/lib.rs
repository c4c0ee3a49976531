//! Proportional-symbol map of the nuclear share of electricity across
//! Europe, drawn in the terminal with Braille Unicode.

pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod symbols;
pub mod ui;
