//! Identifier newtypes for server-side assets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier (LUID) of a site, project, workbook or view
///
/// # Examples
///
/// ```
/// use folio::domain::ids::AssetId;
/// use std::str::FromStr;
///
/// let id = AssetId::from_str("9a8a7b6b-5c4c-3d3d-2e2e-1f1f1f1f1f1f").unwrap();
/// assert_eq!(id.as_str(), "9a8a7b6b-5c4c-3d3d-2e2e-1f1f1f1f1f1f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Creates a new AssetId, rejecting blank identifiers
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Asset ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_rejects_blank() {
        assert!(AssetId::new("").is_err());
        assert!(AssetId::new("   ").is_err());
    }

    #[test]
    fn test_asset_id_serde_is_transparent() {
        let id = AssetId::new("abc-123").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        let back: AssetId = serde_json::from_str("\"abc-123\"").unwrap();
        assert_eq!(back, id);
    }
}
