//! Render fault containment
//!
//! An [`ErrorBoundary`] wraps a rendering step. When the step fails or
//! panics, the boundary latches into `Faulted` and hands back a generic
//! fallback screen until [`ErrorBoundary::reset`] is called. Fault details
//! are only exposed (and logged) when diagnostics are enabled.
//!
//! Without diagnostics, panics raised by a step skip the process panic hook,
//! so nothing reaches stderr either. The first such boundary chains a filter
//! in front of whatever hook is installed at that point.

use serde::Serialize;
use std::cell::Cell;
use std::fmt::Display;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

thread_local! {
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

pub const FALLBACK_TITLE: &str = "Something went wrong";
pub const FALLBACK_MESSAGE: &str =
    "We apologize for the inconvenience. Our technical team has been notified.";

/// Recorded failure of a render step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderFault {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Ok,
    Faulted(RenderFault),
}

/// Recovery action offered by the fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RecoveryAction {
    Retry,
    GoBack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackScreen {
    pub title: &'static str,
    pub message: &'static str,
    pub actions: Vec<RecoveryAction>,
    pub diagnostics: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<T> {
    Content(T),
    Fallback(FallbackScreen),
}

#[derive(Debug)]
pub struct ErrorBoundary {
    state: BoundaryState,
    diagnostics: bool,
}

impl ErrorBoundary {
    pub fn new(diagnostics: bool) -> Self {
        Self {
            state: BoundaryState::Ok,
            diagnostics,
        }
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    /// Run `step` unless already faulted
    pub fn render<T, E, F>(&mut self, step: F) -> Rendered<T>
    where
        E: Display,
        F: FnOnce() -> Result<T, E>,
    {
        if let BoundaryState::Faulted(fault) = &self.state {
            return Rendered::Fallback(self.fallback(fault));
        }

        let outcome = if self.diagnostics {
            catch_unwind(AssertUnwindSafe(step))
        } else {
            install_quiet_hook();
            let outer = QUIET_PANICS.with(|q| q.replace(true));
            let outcome = catch_unwind(AssertUnwindSafe(step));
            QUIET_PANICS.with(|q| q.set(outer));
            outcome
        };

        let message = match outcome {
            Ok(Ok(content)) => return Rendered::Content(content),
            Ok(Err(e)) => e.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        if self.diagnostics {
            tracing::error!(error = %message, "render failed");
        }
        let fault = RenderFault { message };
        let screen = self.fallback(&fault);
        self.state = BoundaryState::Faulted(fault);
        Rendered::Fallback(screen)
    }

    /// Clear the fault so the next render tries again
    pub fn reset(&mut self) {
        self.state = BoundaryState::Ok;
    }

    fn fallback(&self, fault: &RenderFault) -> FallbackScreen {
        FallbackScreen {
            title: FALLBACK_TITLE,
            message: FALLBACK_MESSAGE,
            actions: vec![RecoveryAction::Retry, RecoveryAction::GoBack],
            diagnostics: self.diagnostics.then(|| fault.message.clone()),
        }
    }
}

fn install_quiet_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during render".to_string()
    }
}
