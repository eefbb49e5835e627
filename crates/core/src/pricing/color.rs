use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::snapshot::ColorThresholds;

/// Display semaphore for a margin percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginColor {
    Green,
    Yellow,
    Orange,
    Red,
}

impl MarginColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for MarginColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First satisfied threshold wins, scanning green then yellow then
/// orange; everything below orange is red. Threshold ordering is
/// enforced at snapshot construction, not here.
pub fn classify(margin_percent: Decimal, thresholds: &ColorThresholds) -> MarginColor {
    if margin_percent >= thresholds.green {
        MarginColor::Green
    } else if margin_percent >= thresholds.yellow {
        MarginColor::Yellow
    } else if margin_percent >= thresholds.orange {
        MarginColor::Orange
    } else {
        MarginColor::Red
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::snapshot::ColorThresholds;

    use super::{classify, MarginColor};

    fn thresholds() -> ColorThresholds {
        ColorThresholds {
            green: Decimal::from(10),
            yellow: Decimal::ZERO,
            orange: Decimal::from(-5),
        }
    }

    #[test]
    fn bands_are_inclusive_at_their_threshold() {
        let t = thresholds();
        assert_eq!(classify(Decimal::from(10), &t), MarginColor::Green);
        assert_eq!(classify(Decimal::ZERO, &t), MarginColor::Yellow);
        assert_eq!(classify(Decimal::from(-5), &t), MarginColor::Orange);
        assert_eq!(classify(Decimal::new(-501, 2), &t), MarginColor::Red);
    }

    #[test]
    fn classification_is_total_over_a_wide_sweep() {
        let t = thresholds();
        let mut margin = Decimal::from(-50);
        while margin <= Decimal::from(50) {
            // Every input lands in exactly one band; classify never panics.
            let _ = classify(margin, &t);
            margin += Decimal::new(25, 2);
        }
    }

    #[test]
    fn equal_thresholds_collapse_the_middle_bands() {
        let t = ColorThresholds {
            green: Decimal::from(5),
            yellow: Decimal::from(5),
            orange: Decimal::from(5),
        };
        assert_eq!(classify(Decimal::from(5), &t), MarginColor::Green);
        assert_eq!(classify(Decimal::new(499, 2), &t), MarginColor::Red);
    }
}
