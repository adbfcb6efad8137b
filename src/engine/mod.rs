//! Rule engine facade module

mod rule_engine;

#[cfg(test)]
mod property_tests;

pub use rule_engine::*;
