//! Property tests for the creditability engine

use creditable_coverage::evaluation::price_plan;
use creditable_coverage::{
    ActuarialAssumptions, AssumptionOverrides, CostSharingType, CreditabilityStatus,
    DeterminationMethod, Evaluator, PlanInput, TierDesign,
};
use proptest::prelude::*;

fn tier_strategy() -> impl Strategy<Value = TierDesign> {
    (
        any::<bool>(),
        0.0..1.0f64,
        0.0..150.0f64,
        any::<bool>(),
        prop::option::of(0.0..500.0f64),
    )
        .prop_map(|(is_copay, rate, copay, uses_deductible, cap_value)| {
            let (cost_sharing_type, share_value) = if is_copay {
                (CostSharingType::Copay, copay)
            } else {
                (CostSharingType::Coinsurance, rate)
            };
            TierDesign {
                cost_sharing_type,
                share_value,
                uses_deductible,
                cap_value,
            }
        })
}

fn plan_strategy() -> impl Strategy<Value = PlanInput> {
    (
        0.0..5000.0f64,
        any::<bool>(),
        tier_strategy(),
        tier_strategy(),
        tier_strategy(),
        tier_strategy(),
    )
        .prop_map(|(deductible, integrated, t1, t2, t3, t4)| {
            PlanInput::new(deductible, 8000.0, [t1, t2, t3, t4])
                .with_integrated_deductible(integrated)
        })
}

fn overrides_strategy() -> impl Strategy<Value = AssumptionOverrides> {
    (
        prop::array::uniform4(0.01..1.0f64),
        prop::array::uniform4(1.0..8000.0f64),
        1.0..80.0f64,
        0.0..1.0f64,
    )
        .prop_map(|(utilization, fill_cost, fills, allocation)| {
            AssumptionOverrides::from(&ActuarialAssumptions {
                utilization,
                fill_cost,
                estimated_annual_fills: fills,
                rx_deductible_allocation: allocation,
            })
        })
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(plan in plan_strategy(), overrides in overrides_strategy()) {
        let evaluator = Evaluator::default();
        for method in [DeterminationMethod::Actuarial, DeterminationMethod::Simplified] {
            let first = evaluator.evaluate(&plan, &method, &overrides);
            let second = evaluator.evaluate(&plan, &method, &overrides);
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn actuarial_percentage_is_plan_pays_over_gross(
        plan in plan_strategy(),
        overrides in overrides_strategy(),
    ) {
        let evaluator = Evaluator::default();
        let breakdown = evaluator.price(&plan, &overrides);
        let result = evaluator.evaluate(&plan, &DeterminationMethod::Actuarial, &overrides);

        prop_assert!(breakdown.gross_cost > 0.0);
        prop_assert_eq!(result.actuarial_percentage, breakdown.plan_pays / breakdown.gross_cost);
        prop_assert_eq!(result.is_creditable, result.actuarial_percentage >= 0.72);
        let expected = if result.is_creditable {
            CreditabilityStatus::Creditable
        } else {
            CreditabilityStatus::NonCreditable
        };
        prop_assert_eq!(result.result, expected);
    }

    #[test]
    fn higher_share_never_raises_actuarial_value(
        plan in plan_strategy(),
        overrides in overrides_strategy(),
        tier in 0usize..4,
        bump in 0.0..1.0f64,
    ) {
        let evaluator = Evaluator::default();
        let mut richer = plan.clone();
        let design = &mut richer.tiers[tier];
        design.share_value = match design.cost_sharing_type {
            CostSharingType::Copay => design.share_value + bump * 50.0,
            CostSharingType::Coinsurance => (design.share_value + bump).min(1.0),
        };

        let base = evaluator.evaluate(&plan, &DeterminationMethod::Actuarial, &overrides);
        let worse = evaluator.evaluate(&richer, &DeterminationMethod::Actuarial, &overrides);
        prop_assert!(
            worse.actuarial_percentage <= base.actuarial_percentage + 1e-9,
            "AV rose from {} to {}", base.actuarial_percentage, worse.actuarial_percentage
        );
    }

    #[test]
    fn deductible_covering_tier_charges_full_gross(
        design in tier_strategy(),
        overrides in overrides_strategy(),
        surplus in 0.0..1000.0f64,
    ) {
        let assumptions = overrides.apply_to(&ActuarialAssumptions::default());
        let gross_t1 = assumptions.fills(0) * assumptions.fill_cost[0];

        let mut first = design;
        first.uses_deductible = true;
        let free = TierDesign::copay(0.0, false);
        let plan = PlanInput::new(gross_t1 + surplus, 0.0, [first, free, free, free]);

        let breakdown = price_plan(&plan, &assumptions);
        prop_assert_eq!(breakdown.tiers[0].member_cost, breakdown.tiers[0].gross_cost);
    }

    #[test]
    fn coinsurance_never_exceeds_cap(
        plan in plan_strategy(),
        overrides in overrides_strategy(),
        caps in prop::array::uniform4(0.01..300.0f64),
    ) {
        let mut capped = plan;
        for (design, cap) in capped.tiers.iter_mut().zip(caps) {
            design.cost_sharing_type = CostSharingType::Coinsurance;
            design.share_value = design.share_value.min(1.0);
            design.cap_value = Some(cap);
        }

        let breakdown = Evaluator::default().price(&capped, &overrides);
        for (tier, cap) in breakdown.tiers.iter().zip(caps) {
            prop_assert!(tier.member_cost <= tier.deductible_applied + tier.fills * cap + 1e-9);
            prop_assert!(tier.member_cost >= 0.0);
        }
    }

    #[test]
    fn deductible_pool_is_conserved(plan in plan_strategy(), overrides in overrides_strategy()) {
        let breakdown = Evaluator::default().price(&plan, &overrides);
        let applied: f64 = breakdown.tiers.iter().map(|t| t.deductible_applied).sum();

        prop_assert!(breakdown.remaining_deductible >= 0.0);
        let unaccounted =
            applied + breakdown.remaining_deductible - breakdown.effective_deductible;
        prop_assert!(unaccounted.abs() < 1e-6);
        for (tier, design) in breakdown.tiers.iter().zip(plan.tiers.iter()) {
            prop_assert!(tier.deductible_applied <= tier.gross_cost);
            if !design.uses_deductible {
                prop_assert_eq!(tier.deductible_applied, 0.0);
            }
        }
    }
}

#[test]
fn unsupported_method_never_panics_and_is_unknown() {
    let plan = PlanInput::new(
        0.0,
        0.0,
        [
            TierDesign::copay(10.0, false),
            TierDesign::copay(20.0, false),
            TierDesign::copay(40.0, false),
            TierDesign::copay(80.0, false),
        ],
    );
    for name in ["BOGUS", "", "actuarial", "Simplified"] {
        let method = DeterminationMethod::from(name);
        let result = Evaluator::default().evaluate(&plan, &method, &AssumptionOverrides::none());
        assert_eq!(result.result, CreditabilityStatus::Unknown);
        assert!(!result.is_creditable);
        assert_eq!(result.method.as_str(), name);
    }
}
