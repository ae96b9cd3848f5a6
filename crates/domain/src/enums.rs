use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the trader adds the input asset to the pool or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Input asset flows into the pool, counter asset flows out.
    AddToPool,
    /// Input asset flows out of the pool, counter asset flows in.
    RemoveFromPool,
}

/// Which reserve the trade amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSide {
    Quote,
    Base,
}

impl AssetSide {
    /// Returns the opposite side.
    #[must_use]
    pub fn counter(self) -> Self {
        match self {
            Self::Quote => Self::Base,
            Self::Base => Self::Quote,
        }
    }
}

impl fmt::Display for AssetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote => f.write_str("quote"),
            Self::Base => f.write_str("base"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddToPool => f.write_str("add_to_pool"),
            Self::RemoveFromPool => f.write_str("remove_from_pool"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_side() {
        assert_eq!(AssetSide::Quote.counter(), AssetSide::Base);
        assert_eq!(AssetSide::Base.counter(), AssetSide::Quote);
    }
}
