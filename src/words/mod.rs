// Practice word generation
pub mod generator;

pub use generator::{WordGenError, WordGenOptions, WordGenerator, WordSet, Words};
