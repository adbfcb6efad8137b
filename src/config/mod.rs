//! Configuration module
//!
//! Engine settings deserialize from JSON (or a Python dict with the
//! `python` feature); every key is optional.

mod engine;

pub use engine::*;
