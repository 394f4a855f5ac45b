//! candlequiz: candlestick pattern recognition trainer.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], and the terminal front end in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
