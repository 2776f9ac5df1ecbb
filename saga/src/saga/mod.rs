// saga/src/saga/mod.rs

pub mod definition;
pub mod execution;

pub use definition::Saga;
