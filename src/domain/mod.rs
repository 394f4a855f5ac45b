//! Core domain types and logic: candle generation, classification and quiz
//! construction.

pub mod candle;
pub mod archetype;
pub mod pattern;
pub mod walk;
pub mod classifier;
pub mod question_bank;
pub mod session;
pub mod game_config;
pub mod config_validation;
pub mod error;
