//! Forms Configuration

use crate::render::{RenderContext, DEFAULT_DATE_FORMAT};
use crate::timing::Debouncer;
use carepulse_common::{Clock, Region};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Forms configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Region preselected by phone inputs
    pub default_phone_region: Region,
    /// Date picker display format
    pub date_format: String,
    /// Expose fault details in fallback screens
    pub diagnostics: bool,
    /// Debounce delay for change handlers
    pub debounce_ms: u64,
    /// Backend base URL
    pub api_url: Option<String>,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            default_phone_region: Region::us(),
            date_format: DEFAULT_DATE_FORMAT.into(),
            diagnostics: false,
            debounce_ms: 300,
            api_url: None,
        }
    }
}

impl FormsConfig {
    /// Renderer context carrying these settings
    pub fn render_context(&self, clock: Arc<dyn Clock>) -> RenderContext {
        RenderContext::new(clock)
            .with_region(self.default_phone_region.clone())
            .with_date_format(self.date_format.clone())
    }

    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(Duration::from_millis(self.debounce_ms))
    }
}
