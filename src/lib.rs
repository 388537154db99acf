//! Translates annotated TypeScript classes into Cairo StarkNet contracts.
//!
//! The pipeline is a single forward pass: [`parser`] turns source text into a
//! syntax tree, [`transpiler`] builds a contract model from the first class it
//! finds, and [`generator`] renders that model as Cairo.

pub mod error;
pub mod generator;
pub mod parser;
pub mod transpiler;

#[cfg(test)]
mod tests;

pub use error::TranspileError;
pub use transpiler::{transpile, TranspileOptions};
