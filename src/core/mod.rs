// src/core/mod.rs
pub mod board;
pub mod catalog;
pub mod composer;
pub mod engine;
pub mod grid;
pub mod sequence;
pub mod settings;
pub mod types;
