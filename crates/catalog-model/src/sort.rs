use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Ordering applied to filtered results.
///
/// Every ordering is stable: items with equal keys keep store order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Store order.
    #[default]
    Featured,
    /// Most expensive first.
    PriceHighToLow,
    /// Cheapest first.
    PriceLowToHigh,
    /// New arrivals first.
    Newest,
    /// Largest size first; unsized items last.
    Largest,
    /// Most recent listing date first; undated items last.
    RecentlyListed,
}

impl SortKey {
    pub const fn all() -> &'static [SortKey] {
        &[
            Self::Featured,
            Self::PriceHighToLow,
            Self::PriceLowToHigh,
            Self::Newest,
            Self::Largest,
            Self::RecentlyListed,
        ]
    }

    /// Stable machine name, as used on the command line and in settings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceHighToLow => "price-high-to-low",
            Self::PriceLowToHigh => "price-low-to-high",
            Self::Newest => "newest",
            Self::Largest => "largest",
            Self::RecentlyListed => "recently-listed",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Featured => "Featured",
            Self::PriceHighToLow => "Price: High to Low",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::Newest => "Newest",
            Self::Largest => "Largest",
            Self::RecentlyListed => "Recently Listed",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ModelError::Message(format!("unknown sort key: {s}")))
    }
}
