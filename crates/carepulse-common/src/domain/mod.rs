//! CarePulse Domain Model
//!
//! Value objects shared by the validation, forms and CLI crates.

pub mod value_objects;

pub use value_objects::*;
