//! Implementation of chess rules: board representation, piece movement, check
//! detection and move execution.

pub mod attacks;
pub mod board;
pub mod core;
pub mod error;
pub mod movegen;
pub mod moves;
pub mod state;
