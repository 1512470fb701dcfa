#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::error::MoneyError;

/// Highest number of decimals an asset may declare. Keeps `10^decimals`
/// inside a `u64` so decimal scaling stays exact.
pub const MAX_ASSET_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A token as seen by the ledger: an identifier plus the number of decimals
/// its smallest unit is scaled by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct Asset {
    pub id: AssetId,
    pub decimals: u8,
}

impl Asset {
    pub fn new(id: impl Into<AssetId>, decimals: u8) -> Self {
        Self {
            id: id.into(),
            decimals,
        }
    }

    /// Number of smallest units in one whole token.
    pub fn unit_scale(&self) -> Result<u64, MoneyError> {
        if self.decimals > MAX_ASSET_DECIMALS {
            return Err(MoneyError::UnsupportedDecimals(self.decimals));
        }
        10u64
            .checked_pow(u32::from(self.decimals))
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.id, self.decimals)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn asset_ids_are_normalized() {
        assert_eq!(AssetId::new(" MXN "), AssetId::from("mxn"));
        assert_eq!(AssetId::new("Usd").as_str(), "usd");
        let id: AssetId = serde_json::from_str(r#"" BRL""#).unwrap();
        assert_eq!(id.as_str(), "brl");
    }

    #[test]
    fn unit_scale_follows_decimals() {
        assert_eq!(Asset::new("usd", 6).unit_scale(), Ok(1_000_000));
        assert_eq!(Asset::new("wei", 18).unit_scale(), Ok(1_000_000_000_000_000_000));
        assert_eq!(
            Asset::new("odd", 19).unit_scale(),
            Err(MoneyError::UnsupportedDecimals(19))
        );
    }
}
