//! CarePulse Common - Shared types for the patient intake pipeline
//!
//! This crate provides the primitives every other CarePulse crate speaks:
//! - Field values and records (the untyped form data model)
//! - Clock abstraction for every "now"-relative rule
//! - Resource identifiers returned by submission backends
//! - Error handling
//!
//! # Architecture
//!
//! ## Value Objects
//! Immutable, self-validating primitives (`ResourceId`, `Region`).
//!
//! ## Records
//! A form's data is an ordered map of field name to [`FieldValue`]. Records are
//! plain data: schemas interpret them, controllers own them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod domain;
pub mod error;
pub mod value;

pub use clock::*;
pub use domain::*;
pub use error::*;
pub use value::*;
