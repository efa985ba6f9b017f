//! Value Objects - Immutable domain primitives with validation

use crate::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a resource created by a submission backend (Value Object)
///
/// Opaque to the pipeline; it is only echoed into redirect routes.
///
/// # Invariants
/// - Non-empty after trimming
/// - Max 128 characters
/// - No `/`, `?` or `#` (it is spliced into a path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Create new resource ID with validation
    pub fn new(id: impl Into<String>) -> CommonResult<Self> {
        let id = id.into().trim().to_string();

        if id.is_empty() {
            return Err(CommonError::InvalidResourceId("cannot be empty".into()));
        }
        if id.len() > 128 {
            return Err(CommonError::InvalidResourceId("max 128 characters".into()));
        }
        if id.chars().any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace()) {
            return Err(CommonError::InvalidResourceId(format!(
                "not path safe: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get inner value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = CommonError;

    fn try_from(value: String) -> CommonResult<Self> {
        Self::new(value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

/// ISO 3166-1 alpha-2 region used for phone country-code inference (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Create region, normalizing to upper case
    pub fn new(code: impl Into<String>) -> CommonResult<Self> {
        let code = code.into().trim().to_ascii_uppercase();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CommonError::InvalidRegion(code));
        }
        Ok(Self(code))
    }

    /// United States, the default calling region
    pub fn us() -> Self {
        Self("US".into())
    }

    /// Get code
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::us()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = CommonError;

    fn try_from(value: String) -> CommonResult<Self> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_id_valid() {
        let id = ResourceId::new(" 65f1c0a2b ").unwrap();
        assert_eq!(id.as_str(), "65f1c0a2b");
    }

    #[test]
    fn test_resource_id_empty_fails() {
        assert!(ResourceId::new("   ").is_err());
    }

    #[test]
    fn test_resource_id_path_unsafe_fails() {
        assert!(ResourceId::new("abc/def").is_err());
        assert!(ResourceId::new("a b").is_err());
        assert!(ResourceId::new("a".repeat(129)).is_err());
    }

    #[test]
    fn test_resource_id_serde() {
        let id: ResourceId = serde_json::from_str("\"user-1\"").unwrap();
        assert_eq!(id.to_string(), "user-1");
        assert!(serde_json::from_str::<ResourceId>("\"\"").is_err());
    }

    #[test]
    fn test_region() {
        assert_eq!(Region::new("gb").unwrap().as_str(), "GB");
        assert!(Region::new("USA").is_err());
        assert_eq!(Region::default(), Region::us());
    }
}
