use std::{collections::BTreeMap, fmt};

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Bucket a chain entry is accounted under.
///
/// The string form is the field name used by the upstream analytics data
/// (`tvl`, `staking`, `pool2`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Base value, anything without a recognised suffix
    #[default]
    Tvl,
    Staking,
    Pool2,
    Borrowed,
    DoubleCounted,
    LiquidStaking,
    Vesting,
}

/// Key suffixes checked in order, first match wins.
const KEY_SUFFIXES: [(&str, Category); 6] = [
    ("-staking", Category::Staking),
    ("-pool2", Category::Pool2),
    ("-borrowed", Category::Borrowed),
    ("-doublecounted", Category::DoubleCounted),
    ("-liquidstaking", Category::LiquidStaking),
    ("-vesting", Category::Vesting),
];

impl Category {
    /// Classify a composite chain key such as `Ethereum-staking`.
    ///
    /// Matching is a case-sensitive substring test, so `Ethereum-Staking`
    /// lands in [`Category::Tvl`].
    pub fn classify(key: &str) -> Self {
        KEY_SUFFIXES
            .iter()
            .find(|(suffix, _)| key.contains(suffix))
            .map_or(Self::Tvl, |(_, category)| *category)
    }
}

/// Per-category sub-totals of a single reading.
///
/// Only categories that received at least one entry are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(BTreeMap<Category, f64>);

impl CategoryBreakdown {
    pub fn add(&mut self, category: Category, value: f64) {
        *self.0.entry(category).or_insert(0.0) += value;
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(category, value)| (*category, *value))
    }

    /// Sum of all sub-totals, accumulated in category order.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl fmt::Display for CategoryBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (category, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{category}: {value:.2}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Category::classify("Ethereum"), Category::Tvl);
        assert_eq!(Category::classify("Ethereum-staking"), Category::Staking);
        assert_eq!(Category::classify("Arbitrum-pool2"), Category::Pool2);
        assert_eq!(Category::classify("Base-borrowed"), Category::Borrowed);
        assert_eq!(
            Category::classify("Ethereum-doublecounted"),
            Category::DoubleCounted
        );
        assert_eq!(
            Category::classify("Ethereum-liquidstaking"),
            Category::LiquidStaking
        );
        assert_eq!(Category::classify("Solana-vesting"), Category::Vesting);
    }

    #[test]
    fn test_classify_is_case_sensitive_and_needs_dash() {
        assert_eq!(Category::classify("Ethereum-Staking"), Category::Tvl);
        assert_eq!(Category::classify("staking"), Category::Tvl);
        assert_eq!(Category::classify("borrowed"), Category::Tvl);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::DoubleCounted.as_ref(), "doublecounted");
        assert_eq!(Category::LiquidStaking.to_string(), "liquidstaking");
        assert_eq!(Category::from_str("pool2").unwrap(), Category::Pool2);
    }

    #[test]
    fn test_breakdown_display() {
        let mut breakdown = CategoryBreakdown::default();
        breakdown.add(Category::Staking, 50.0);
        breakdown.add(Category::Tvl, 100.0);
        breakdown.add(Category::Staking, 0.5);

        assert_eq!(breakdown.to_string(), "{tvl: 100.00, staking: 50.50}");
        assert_eq!(breakdown.total(), 150.5);
    }
}
