#![forbid(unsafe_code)]

//! Shelfwise headless demo.
//!
//! Generates a synthetic inventory, mounts it in an item browser over a
//! simulated scrollable element, and drives scroll bursts frame by frame.

pub mod cli;
pub mod inventory;
pub mod simulation;
