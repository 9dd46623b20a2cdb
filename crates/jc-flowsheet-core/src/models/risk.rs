//! JC Index risk classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest JC Index classified as high risk.
pub const HIGH_RISK_THRESHOLD: f64 = 4.0;

/// Lowest JC Index classified as medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 3.5;

/// Discrete risk tier derived from a JC Index value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

/// Classify a JC Index value.
///
/// Total over all floats: negative values are not rejected and classify as
/// [`RiskTier::Low`], as does NaN. Boundary values belong to the upper tier
/// (3.5 is Medium, 4.0 is High).
pub fn classify_risk(jc_index: f64) -> RiskTier {
    if jc_index >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if jc_index >= MEDIUM_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

impl RiskTier {
    /// All tiers, lowest first (legend order).
    pub fn legend() -> [RiskTier; 3] {
        [RiskTier::Low, RiskTier::Medium, RiskTier::High]
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }

    /// Traffic-light indicator glyph.
    pub fn indicator(&self) -> &'static str {
        match self {
            RiskTier::Low => "🟢",
            RiskTier::Medium => "🟡",
            RiskTier::High => "🔴",
        }
    }

    /// JC Index range covered by this tier, as shown in the legend.
    pub fn range_label(&self) -> &'static str {
        match self {
            RiskTier::Low => "< 3.5",
            RiskTier::Medium => "3.5 - 4.0",
            RiskTier::High => "> 4.0",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_documented_scenarios() {
        assert_eq!(classify_risk(4.5), RiskTier::High);
        assert_eq!(classify_risk(3.5), RiskTier::Medium);
        assert_eq!(classify_risk(2.0), RiskTier::Low);
    }

    #[test]
    fn test_boundaries_belong_to_upper_tier() {
        assert_eq!(classify_risk(4.0), RiskTier::High);
        assert_eq!(classify_risk(3.5), RiskTier::Medium);
        assert_eq!(classify_risk(3.499_999), RiskTier::Low);
        assert_eq!(classify_risk(3.999_999), RiskTier::Medium);
    }

    #[test]
    fn test_negative_and_nan_are_low() {
        assert_eq!(classify_risk(-1.0), RiskTier::Low);
        assert_eq!(classify_risk(f64::NAN), RiskTier::Low);
    }

    #[test]
    fn test_legend_order_and_labels() {
        let legend = RiskTier::legend();
        assert_eq!(legend, [RiskTier::Low, RiskTier::Medium, RiskTier::High]);
        assert_eq!(RiskTier::Medium.range_label(), "3.5 - 4.0");
        assert_eq!(RiskTier::High.indicator(), "🔴");
        assert_eq!(RiskTier::Low.to_string(), "Low");
    }

    proptest! {
        #[test]
        fn prop_below_medium_is_low(x in -1000.0f64..3.5) {
            prop_assert_eq!(classify_risk(x), RiskTier::Low);
        }

        #[test]
        fn prop_medium_band(x in 3.5f64..4.0) {
            prop_assert_eq!(classify_risk(x), RiskTier::Medium);
        }

        #[test]
        fn prop_high_band(x in 4.0f64..1000.0) {
            prop_assert_eq!(classify_risk(x), RiskTier::High);
        }

        #[test]
        fn prop_monotonic(a in -10.0f64..20.0, b in -10.0f64..20.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify_risk(lo) <= classify_risk(hi));
        }
    }
}
