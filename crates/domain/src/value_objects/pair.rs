use crate::error::{Result, VammError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = ':';
const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// Identifier of a traded pair, written `"<base>:<quote>"` (e.g. `ubtc:unusd`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPair {
    base: String,
    quote: String,
}

impl AssetPair {
    /// Creates a pair from its two denoms.
    ///
    /// # Errors
    /// Returns `InvalidPair` if either denom is malformed or both are equal.
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Result<Self> {
        let base = base.into();
        let quote = quote.into();
        let raw = format!("{base}{SEPARATOR}{quote}");
        validate_denom(&raw, &base)?;
        validate_denom(&raw, &quote)?;
        if base == quote {
            return Err(invalid(&raw, "base and quote must differ"));
        }
        Ok(Self { base, quote })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Bytes used as the registry storage key.
    #[must_use]
    pub fn key_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

fn invalid(raw: &str, reason: impl Into<String>) -> VammError {
    VammError::InvalidPair {
        value: raw.to_string(),
        reason: reason.into(),
    }
}

fn validate_denom(raw: &str, denom: &str) -> Result<()> {
    if denom.is_empty() {
        return Err(invalid(raw, "denom is empty"));
    }
    let len = denom.len();
    if !(MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&len) {
        return Err(invalid(
            raw,
            format!("denom {denom:?} must be {MIN_DENOM_LEN}-{MAX_DENOM_LEN} characters"),
        ));
    }
    let mut chars = denom.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(raw, format!("denom {denom:?} must start with a letter")));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-'))) {
        return Err(invalid(raw, format!("denom {denom:?} contains {bad:?}")));
    }
    Ok(())
}

impl FromStr for AssetPair {
    type Err = VammError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(invalid(s, "pair is empty"));
        }
        let mut parts = s.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(base), Some(quote), None) => Self::new(base, quote),
            _ => Err(invalid(s, "expected exactly one ':' separator")),
        }
    }
}

impl TryFrom<String> for AssetPair {
    type Error = VammError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AssetPair> for String {
    fn from(pair: AssetPair) -> Self {
        pair.to_string()
    }
}

impl fmt::Display for AssetPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.base, self.quote)
    }
}
