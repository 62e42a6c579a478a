//! Pricing Model
//!
//! Published per-minute rates, the plan tiers built on them, and the ROI
//! calculator shown on the marketing site. Everything here is pure
//! arithmetic over the constants below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pay-as-you-go rate, USD per connected minute
pub const DEFAULT_COST_PER_MINUTE: f64 = 0.0143;

/// Fully loaded hourly cost of a human phone agent used for ROI comparisons
pub const HUMAN_AGENT_HOURLY_RATE: f64 = 18.0;

/// A subscription plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTier {
    pub id: &'static str,
    pub name: &'static str,
    /// Flat monthly fee, USD
    pub monthly_fee: f64,
    /// Minutes covered by the fee
    pub included_minutes: u64,
    /// Rate for minutes beyond the included allowance
    pub overage_per_minute: f64,
}

impl PricingTier {
    /// Monthly bill for `minutes` of usage
    pub fn monthly_cost(&self, minutes: f64) -> f64 {
        let overage = (minutes - self.included_minutes as f64).max(0.0);
        self.monthly_fee + overage * self.overage_per_minute
    }
}

pub static TIERS: [PricingTier; 4] = [
    PricingTier {
        id: "pay-as-you-go",
        name: "Pay as you go",
        monthly_fee: 0.0,
        included_minutes: 0,
        overage_per_minute: DEFAULT_COST_PER_MINUTE,
    },
    PricingTier {
        id: "starter",
        name: "Starter",
        monthly_fee: 49.0,
        included_minutes: 4_000,
        overage_per_minute: 0.012,
    },
    PricingTier {
        id: "growth",
        name: "Growth",
        monthly_fee: 199.0,
        included_minutes: 20_000,
        overage_per_minute: 0.010,
    },
    PricingTier {
        id: "scale",
        name: "Scale",
        monthly_fee: 799.0,
        included_minutes: 100_000,
        overage_per_minute: 0.008,
    },
];

pub fn tier(id: &str) -> Option<&'static PricingTier> {
    TIERS.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Tier with the lowest bill at `minutes` of monthly usage
pub fn cheapest_tier(minutes: f64) -> &'static PricingTier {
    TIERS
        .iter()
        .min_by(|a, b| a.monthly_cost(minutes).total_cmp(&b.monthly_cost(minutes)))
        .unwrap_or(&TIERS[0])
}

/// Invalid calculator input
#[derive(Error, Debug, PartialEq)]
pub enum PricingError {
    #[error("{field} must be a finite, non-negative number")]
    InvalidInput { field: &'static str },
}

/// Usage profile entered in the calculator
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct UsageInput {
    pub calls_per_month: u64,
    pub avg_duration_minutes: f64,
    #[serde(default = "default_cost_per_minute")]
    pub cost_per_minute: f64,
}

fn default_cost_per_minute() -> f64 {
    DEFAULT_COST_PER_MINUTE
}

impl UsageInput {
    pub fn new(calls_per_month: u64, avg_duration_minutes: f64) -> Self {
        Self {
            calls_per_month,
            avg_duration_minutes,
            cost_per_minute: DEFAULT_COST_PER_MINUTE,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        check("avg_duration_minutes", self.avg_duration_minutes)?;
        check("cost_per_minute", self.cost_per_minute)
    }

    pub fn monthly_minutes(&self) -> f64 {
        self.calls_per_month as f64 * self.avg_duration_minutes
    }
}

fn check(field: &'static str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PricingError::InvalidInput { field })
    }
}

/// Cost breakdown for a usage profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub monthly_minutes: f64,
    pub monthly_cost: f64,
    pub annual_cost: f64,
    pub cost_per_call: f64,
    /// Plan that would bill least for the same minutes
    pub recommended_tier: &'static str,
    pub recommended_tier_cost: f64,
}

pub fn estimate(input: &UsageInput) -> Result<CostEstimate, PricingError> {
    input.validate()?;

    let minutes = input.monthly_minutes();
    let monthly_cost = minutes * input.cost_per_minute;
    let best = cheapest_tier(minutes);

    Ok(CostEstimate {
        monthly_minutes: minutes,
        monthly_cost: round_cents(monthly_cost),
        annual_cost: round_cents(monthly_cost * 12.0),
        cost_per_call: round_cents(input.avg_duration_minutes * input.cost_per_minute),
        recommended_tier: best.id,
        recommended_tier_cost: round_cents(best.monthly_cost(minutes)),
    })
}

/// Savings of the voice agent against human agents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiEstimate {
    pub monthly_minutes: f64,
    pub ai_monthly_cost: f64,
    pub human_monthly_cost: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    /// Share of the human cost saved, 0-100
    pub savings_percent: f64,
}

pub fn roi(input: &UsageInput, human_hourly_rate: f64) -> Result<RoiEstimate, PricingError> {
    input.validate()?;
    check("human_hourly_rate", human_hourly_rate)?;

    let minutes = input.monthly_minutes();
    let ai = minutes * input.cost_per_minute;
    let human = minutes / 60.0 * human_hourly_rate;
    let savings = human - ai;
    let percent = if human > 0.0 { savings / human * 100.0 } else { 0.0 };

    Ok(RoiEstimate {
        monthly_minutes: minutes,
        ai_monthly_cost: round_cents(ai),
        human_monthly_cost: round_cents(human),
        monthly_savings: round_cents(savings),
        annual_savings: round_cents(savings * 12.0),
        savings_percent: (percent * 10.0).round() / 10.0,
    })
}

/// Round a dollar amount to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_example() {
        let input = UsageInput {
            calls_per_month: 1000,
            avg_duration_minutes: 5.0,
            cost_per_minute: 0.0143,
        };
        let est = estimate(&input).unwrap();
        assert_eq!(est.monthly_minutes, 5000.0);
        assert_eq!(est.monthly_cost, 71.5);
        assert_eq!(est.annual_cost, 858.0);
        assert_eq!(est.cost_per_call, 0.07);

        // Reproducible
        assert_eq!(estimate(&input).unwrap(), est);
    }

    #[test]
    fn test_default_rate() {
        assert_eq!(UsageInput::new(1000, 5.0).cost_per_minute, 0.0143);
    }

    #[test]
    fn test_tier_cost() {
        let starter = tier("starter").unwrap();
        assert_eq!(starter.monthly_cost(1_000.0), 49.0);
        assert_eq!(round_cents(starter.monthly_cost(5_000.0)), 61.0);
        assert!(tier("STARTER").is_some());
        assert!(tier("enterprise").is_none());
    }

    #[test]
    fn test_cheapest_tier_moves_with_volume() {
        assert_eq!(cheapest_tier(0.0).id, "pay-as-you-go");
        assert_eq!(cheapest_tier(1_000.0).id, "pay-as-you-go");
        assert_eq!(cheapest_tier(5_000.0).id, "starter");
        assert_eq!(cheapest_tier(50_000.0).id, "growth");
        assert_eq!(cheapest_tier(200_000.0).id, "scale");

        let est = estimate(&UsageInput::new(1000, 5.0)).unwrap();
        assert_eq!(est.recommended_tier, "starter");
        assert_eq!(est.recommended_tier_cost, 61.0);
    }

    #[test]
    fn test_roi() {
        let r = roi(&UsageInput::new(1000, 5.0), 18.0).unwrap();
        assert_eq!(r.human_monthly_cost, 1500.0);
        assert_eq!(r.ai_monthly_cost, 71.5);
        assert_eq!(r.monthly_savings, 1428.5);
        assert_eq!(r.annual_savings, 17142.0);
        assert_eq!(r.savings_percent, 95.2);
    }

    #[test]
    fn test_roi_zero_usage() {
        let r = roi(&UsageInput::new(0, 5.0), HUMAN_AGENT_HOURLY_RATE).unwrap();
        assert_eq!(r.monthly_savings, 0.0);
        assert_eq!(r.savings_percent, 0.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut input = UsageInput::new(10, f64::NAN);
        assert_eq!(
            estimate(&input),
            Err(PricingError::InvalidInput {
                field: "avg_duration_minutes"
            })
        );

        input.avg_duration_minutes = 3.0;
        input.cost_per_minute = -0.01;
        assert!(estimate(&input).is_err());

        assert_eq!(
            roi(&UsageInput::new(10, 3.0), f64::INFINITY),
            Err(PricingError::InvalidInput {
                field: "human_hourly_rate"
            })
        );
    }
}
