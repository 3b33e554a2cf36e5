//! Expected annual cost model for a plan design
//!
//! Gross cost is plan-independent: expected annual fills weighted by tier
//! utilization and fill cost. Member cost walks the tiers in order 1 to 4,
//! drawing down a shared deductible pool before applying each tier's copay
//! or coinsurance.

use serde::{Deserialize, Serialize};

use crate::assumptions::ActuarialAssumptions;
use crate::plan::{CostSharingType, PlanInput, TierDesign, TIER_COUNT};

/// Expected annual cost of one tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCost {
    /// Tier number, 1 through 4
    pub tier: u8,
    pub fills: f64,
    /// Fills times fill cost, before any cost sharing
    pub gross_cost: f64,
    /// Portion of gross cost paid from the deductible pool
    pub deductible_applied: f64,
    pub member_cost: f64,
}

/// Full cost picture behind an actuarial value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub gross_cost: f64,
    pub effective_deductible: f64,
    /// Deductible dollars left unconsumed after tier 4
    pub remaining_deductible: f64,
    pub tiers: [TierCost; TIER_COUNT],
    pub total_member_cost: f64,
    pub plan_pays: f64,
}

impl CostBreakdown {
    /// Plan pays over gross cost, `None` when gross cost is not positive
    pub fn actuarial_value(&self) -> Option<f64> {
        if !self.gross_cost.is_finite() || self.gross_cost <= 0.0 {
            return None;
        }
        let av = self.plan_pays / self.gross_cost;
        av.is_finite().then_some(av)
    }
}

/// Expected annual drug spend per member if the plan paid nothing
pub fn gross_cost(assumptions: &ActuarialAssumptions) -> f64 {
    let weighted: f64 = assumptions
        .utilization
        .iter()
        .zip(assumptions.fill_cost.iter())
        .map(|(util, cost)| util * cost)
        .sum();
    assumptions.estimated_annual_fills * weighted
}

/// Deductible dollars available to the Rx tiers
pub fn effective_deductible(plan: &PlanInput, assumptions: &ActuarialAssumptions) -> f64 {
    if plan.integrated_deductible {
        plan.deductible * assumptions.rx_deductible_allocation
    } else {
        plan.deductible
    }
}

fn capped(amount: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(limit) => amount.min(limit),
        None => amount,
    }
}

/// Member cost for one tier given the deductible dollars it consumed
///
/// `deductible_applied` must be zero for tiers that do not use the deductible.
pub fn tier_member_cost(
    design: &TierDesign,
    fills: f64,
    fill_cost: f64,
    gross: f64,
    deductible_applied: f64,
) -> f64 {
    let share = design.share_value;
    let cap = design.cap_limit(fills);

    if !design.uses_deductible {
        return match design.cost_sharing_type {
            CostSharingType::Copay => fills * share,
            CostSharingType::Coinsurance => capped(gross * share, cap),
        };
    }

    // Tier sits entirely inside the deductible
    if deductible_applied == gross {
        return gross;
    }

    match design.cost_sharing_type {
        CostSharingType::Copay => {
            let absorbed_fills = deductible_applied / fill_cost;
            deductible_applied + (fills - absorbed_fills) * share
        }
        CostSharingType::Coinsurance => {
            let residual = gross - deductible_applied;
            deductible_applied + capped(residual * share, cap)
        }
    }
}

/// Price a plan design under a resolved assumption set
pub fn price_plan(plan: &PlanInput, assumptions: &ActuarialAssumptions) -> CostBreakdown {
    let gross_cost = gross_cost(assumptions);
    let effective_deductible = effective_deductible(plan, assumptions);

    let mut remaining_deductible = effective_deductible;
    let mut tiers = [TierCost::default(); TIER_COUNT];

    for (idx, design) in plan.tiers.iter().enumerate() {
        let fills = assumptions.fills(idx);
        let fill_cost = assumptions.fill_cost[idx];
        let gross = fills * fill_cost;

        let deductible_applied = if design.uses_deductible {
            let applied = gross.min(remaining_deductible);
            remaining_deductible -= applied;
            applied
        } else {
            0.0
        };

        let member_cost = tier_member_cost(design, fills, fill_cost, gross, deductible_applied);

        tiers[idx] = TierCost {
            tier: (idx + 1) as u8,
            fills,
            gross_cost: gross,
            deductible_applied,
            member_cost,
        };
        log::trace!("tier {} cost: {:?}", idx + 1, tiers[idx]);
    }

    let total_member_cost: f64 = tiers.iter().map(|t| t.member_cost).sum();

    CostBreakdown {
        gross_cost,
        effective_deductible,
        remaining_deductible,
        tiers,
        total_member_cost,
        plan_pays: gross_cost - total_member_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assumptions() -> ActuarialAssumptions {
        ActuarialAssumptions {
            utilization: [0.5, 0.3, 0.15, 0.05],
            fill_cost: [20.0, 100.0, 250.0, 500.0],
            estimated_annual_fills: 42.0,
            rx_deductible_allocation: 0.2,
        }
    }

    fn copay_plan(deductible: f64, uses_deductible: bool) -> PlanInput {
        PlanInput::new(
            deductible,
            0.0,
            [
                TierDesign::copay(10.0, uses_deductible),
                TierDesign::copay(20.0, uses_deductible),
                TierDesign::copay(40.0, uses_deductible),
                TierDesign::copay(80.0, uses_deductible),
            ],
        )
    }

    #[test]
    fn test_gross_cost_sum_product() {
        // 42 * (10 + 30 + 37.5 + 25)
        assert_relative_eq!(gross_cost(&assumptions()), 4305.0, epsilon = 1e-9);
    }

    #[test]
    fn test_effective_deductible_integrated() {
        let plan = copay_plan(1000.0, true);
        assert_eq!(effective_deductible(&plan, &assumptions()), 1000.0);

        let integrated = plan.with_integrated_deductible(true);
        let effective = effective_deductible(&integrated, &assumptions());
        assert_relative_eq!(effective, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_flat_copays_without_deductible() {
        let breakdown = price_plan(&copay_plan(500.0, false), &assumptions());

        // Deductible untouched when no tier participates
        assert_eq!(breakdown.remaining_deductible, 500.0);
        for tier in &breakdown.tiers {
            assert_eq!(tier.deductible_applied, 0.0);
        }
        // 21*10 + 12.6*20 + 6.3*40 + 2.1*80
        assert_relative_eq!(breakdown.total_member_cost, 882.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.plan_pays, 4305.0 - 882.0, epsilon = 1e-9);
    }

    #[test]
    fn test_deductible_carries_across_tiers() {
        // Tier 1 gross is 420, so 580 carries into tier 2 (gross 1260)
        let breakdown = price_plan(&copay_plan(1000.0, true), &assumptions());

        let t1 = breakdown.tiers[0];
        assert_relative_eq!(t1.deductible_applied, 420.0, epsilon = 1e-9);
        assert_relative_eq!(t1.member_cost, 420.0, epsilon = 1e-9);

        let t2 = breakdown.tiers[1];
        assert_relative_eq!(t2.deductible_applied, 580.0, epsilon = 1e-9);
        // 580 + (12.6 - 580/100) * 20
        assert_relative_eq!(t2.member_cost, 580.0 + 6.8 * 20.0, epsilon = 1e-9);

        // Pool exhausted before tier 3
        let t3 = breakdown.tiers[2];
        assert_eq!(t3.deductible_applied, 0.0);
        assert_relative_eq!(t3.member_cost, 6.3 * 40.0, epsilon = 1e-9);
        assert_eq!(breakdown.remaining_deductible, 0.0);
    }

    #[test]
    fn test_non_participating_tier_skips_pool() {
        let mut plan = copay_plan(1000.0, true);
        plan.tiers[0].uses_deductible = false;

        let breakdown = price_plan(&plan, &assumptions());
        assert_eq!(breakdown.tiers[0].deductible_applied, 0.0);
        // Full 1000 available to tier 2 (gross 1260)
        assert_relative_eq!(breakdown.tiers[1].deductible_applied, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coinsurance_cap_without_deductible() {
        let design = TierDesign::coinsurance(0.5, false).with_cap(100.0);
        // Uncapped would be 0.5 * 2.1 * 500 = 525, cap is 2.1 * 100
        let member = tier_member_cost(&design, 2.1, 500.0, 1050.0, 0.0);
        assert_relative_eq!(member, 210.0, epsilon = 1e-9);

        let uncapped = TierDesign::coinsurance(0.5, false);
        let member = tier_member_cost(&uncapped, 2.1, 500.0, 1050.0, 0.0);
        assert_relative_eq!(member, 525.0, epsilon = 1e-9);
    }

    #[test]
    fn test_coinsurance_cap_after_partial_deductible() {
        let design = TierDesign::coinsurance(0.5, true).with_cap(100.0);
        // Residual 850 * 0.5 = 425, capped at 210, plus 200 deductible
        let member = tier_member_cost(&design, 2.1, 500.0, 1050.0, 200.0);
        assert_relative_eq!(member, 410.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fully_absorbed_tier_pays_gross() {
        let design = TierDesign::coinsurance(0.1, true).with_cap(1.0);
        assert_eq!(tier_member_cost(&design, 2.0, 50.0, 100.0, 100.0), 100.0);

        let copay = TierDesign::copay(5.0, true);
        assert_eq!(tier_member_cost(&copay, 2.0, 50.0, 100.0, 100.0), 100.0);
    }

    #[test]
    fn test_zero_gross_has_no_actuarial_value() {
        let zero = ActuarialAssumptions {
            utilization: [0.0; TIER_COUNT],
            ..assumptions()
        };
        let breakdown = price_plan(&copay_plan(100.0, true), &zero);
        assert_eq!(breakdown.gross_cost, 0.0);
        assert_eq!(breakdown.actuarial_value(), None);
        // Nothing divided by a zero fill cost
        assert!(breakdown.tiers.iter().all(|t| t.member_cost == 0.0));
    }
}
