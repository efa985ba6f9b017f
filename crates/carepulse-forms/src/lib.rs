//! CarePulse Forms - Rendering and submission for intake forms
//!
//! Sits between a host UI and the validation layer:
//! - [`field`]: declarative field descriptors
//! - [`render`]: descriptor + value to a concrete control with a11y wiring
//! - [`controller`]: form state and the submit lifecycle
//! - [`catalogue`]: the landing, registration and appointment forms
//! - [`boundary`]: render fault containment
//!
//! # Example
//!
//! ```ignore
//! let form = FormController::new(landing_form(), action, navigator, Arc::new(SystemClock))?;
//! form.set_value("name", "Jane Doe")?;
//! form.set_value("email", "jane@example.com")?;
//! form.set_value("phone", "+15551230000")?;
//! match form.submit().await {
//!     SubmitOutcome::Succeeded(id) => println!("created {id}"),
//!     SubmitOutcome::Invalid(errors) => println!("{errors}"),
//!     other => println!("{other:?}"),
//! }
//! ```

#![warn(clippy::all)]

pub mod boundary;
pub mod catalogue;
pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod render;
pub mod timing;
pub mod utils;

pub use boundary::{ErrorBoundary, FallbackScreen, Rendered};
pub use catalogue::{appointment_form, landing_form, registration_form, FormDefinition, RedirectRoute};
pub use config::FormsConfig;
pub use controller::{
    FormController, Navigator, SubmissionAction, SubmitOutcome, SubmitStatus, ValidationMode,
};
pub use error::{FailureKind, FormError, Result, SubmissionError, SubmissionFailure};
pub use field::{FieldDescriptor, FieldType};
pub use render::{render, submit_control, ChangeEvent, Control, RenderContext, RenderedField};
