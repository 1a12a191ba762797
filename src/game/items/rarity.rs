// Item rarity and the star row shown on the pickup widget

/// Number of star slots; slot 0 is unused so star `n` lives at index `n`
pub const STAR_SLOTS: usize = 6;

/// Item rarity tiers, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ItemRarity {
    Damaged,
    #[default]
    Common,
    UnCommon,
    Rare,
    Legendary,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 5] = [
        Self::Damaged,
        Self::Common,
        Self::UnCommon,
        Self::Rare,
        Self::Legendary,
    ];

    /// Stars lit for this tier (1 for Damaged up to 5 for Legendary)
    pub fn star_count(self) -> usize {
        match self {
            Self::Damaged => 1,
            Self::Common => 2,
            Self::UnCommon => 3,
            Self::Rare => 4,
            Self::Legendary => 5,
        }
    }

    /// Star flags for the widget: indices `1..=star_count()` are lit
    pub fn active_stars(self) -> [bool; STAR_SLOTS] {
        let mut stars = [false; STAR_SLOTS];
        for star in stars.iter_mut().skip(1).take(self.star_count()) {
            *star = true;
        }
        stars
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Damaged => "Damaged",
            Self::Common => "Common",
            Self::UnCommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Legendary => "Legendary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_zero_never_lit() {
        for rarity in ItemRarity::ALL {
            assert!(!rarity.active_stars()[0]);
        }
    }

    #[test]
    fn test_star_counts() {
        assert_eq!(
            ItemRarity::Damaged.active_stars(),
            [false, true, false, false, false, false]
        );
        assert_eq!(
            ItemRarity::Common.active_stars(),
            [false, true, true, false, false, false]
        );
        assert_eq!(ItemRarity::Legendary.active_stars(), [false, true, true, true, true, true]);
    }

    #[test]
    fn test_stars_monotonic_in_rarity() {
        for (i, lower) in ItemRarity::ALL.iter().enumerate() {
            for higher in &ItemRarity::ALL[i + 1..] {
                let low = lower.active_stars();
                let high = higher.active_stars();

                // Every star lit by the lower tier is lit by the higher one
                for slot in 0..STAR_SLOTS {
                    assert!(!low[slot] || high[slot], "{:?} vs {:?}", lower, higher);
                }
                // and the higher tier lights strictly more
                assert!(higher.star_count() > lower.star_count());
            }
        }
    }

    #[test]
    fn test_rarity_ordering() {
        assert!(ItemRarity::Damaged < ItemRarity::Common);
        assert!(ItemRarity::Rare < ItemRarity::Legendary);
        assert_eq!(ItemRarity::default(), ItemRarity::Common);
    }
}
