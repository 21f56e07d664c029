//! Core projection engine for monthly property cash flows

use log::{info, warn};

use super::cashflows::{AnnualRow, MonthlyRow, ProjectionResult};
use super::debt::DebtServiceCalculator;
use super::irr::{IrrStatus, SolverConfig};
use super::metrics::Metrics;
use super::rollover::{LeaseRollover, DEFAULT_RENEWAL_THRESHOLD};
use super::state::LoanState;
use crate::assumptions::{Assumptions, LeaseTranche, Tenant};

/// Share of terminal value lost to sale costs
pub const DEFAULT_SALE_COST_RATE: f64 = 0.01;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Sale cost load applied to terminal value
    pub sale_cost_rate: f64,

    /// Renewal probability at or above which rollovers renew
    pub renewal_threshold: f64,

    /// IRR solver limits
    pub solver: SolverConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            sale_cost_rate: DEFAULT_SALE_COST_RATE,
            renewal_threshold: DEFAULT_RENEWAL_THRESHOLD,
            solver: SolverConfig::default(),
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with the given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the full projection: operations, debt, metrics, annual rollup
    pub fn project(&self, assumptions: &Assumptions) -> ProjectionResult {
        info!(
            "Projecting {} months: {} tenants, purchase price {:.0}",
            assumptions.hold_months,
            assumptions.tenants.len(),
            assumptions.purchase_price
        );

        let mut monthly = self.project_operations(assumptions);

        let calculator = DebtServiceCalculator::new(&assumptions.debt);
        let loan = calculator.run(
            LoanState::at_closing(&assumptions.debt, assumptions.purchase_price),
            &mut monthly,
        );

        let metrics = Metrics::aggregate(
            assumptions,
            &monthly,
            &loan,
            self.config.sale_cost_rate,
            &self.config.solver,
        );
        for (series, rate, status) in [
            ("unlevered", metrics.unlevered_irr, metrics.unlevered_irr_status),
            ("levered", metrics.levered_irr, metrics.levered_irr_status),
        ] {
            if matches!(status, IrrStatus::Unbracketed | IrrStatus::Degenerate) {
                warn!("No {} IRR root found ({:?}); reporting {}", series, status, rate);
            }
        }

        let annual = AnnualRow::rollup(&monthly);

        info!(
            "Projection complete: unlevered IRR {:.6}/mo, levered IRR {:.6}/mo, terminal value {:.0}",
            metrics.unlevered_irr, metrics.levered_irr, metrics.terminal_value
        );

        ProjectionResult {
            monthly,
            annual,
            metrics,
        }
    }

    /// Unlevered operating rows for months 1..=hold, in order
    pub fn project_operations(&self, assumptions: &Assumptions) -> Vec<MonthlyRow> {
        let rollover = LeaseRollover::new(self.config.renewal_threshold);

        // Resolve each tenant's tranche once, outside the monthly loop
        let rent_roll: Vec<(&Tenant, Option<&LeaseTranche>)> = assumptions
            .tenants
            .iter()
            .map(|tenant| {
                let tranche = tenant.tranche.as_deref().and_then(|name| assumptions.tranche(name));
                (tenant, tranche)
            })
            .collect();

        (1..=assumptions.hold_months)
            .map(|month| self.calculate_month(assumptions, &rollover, &rent_roll, month))
            .collect()
    }

    /// Calculate operating cash flow for a single month
    fn calculate_month(
        &self,
        assumptions: &Assumptions,
        rollover: &LeaseRollover,
        rent_roll: &[(&Tenant, Option<&LeaseTranche>)],
        month: u32,
    ) -> MonthlyRow {
        let mut row = MonthlyRow::new(month);

        for &(tenant, tranche) in rent_roll {
            let tenant_month = rollover.tenant_month(tenant, tranche, month);
            row.gross_rent += tenant_month.rent;
            row.leasing_costs += tenant_month.leasing_costs();
        }

        row.opex = row.gross_rent * assumptions.opex_ratio;
        row.noi = row.gross_rent - row.opex;
        row.capex = assumptions.capex_schedule.amount(month);
        row.reserves = assumptions.reserves_monthly;
        row.unlevered_cf = row.noi - row.leasing_costs - row.capex - row.reserves;

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{npv, unlevered_series, ExitValuation};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use serde_json::json;

    const SAMPLE: &str = include_str!("../../data/sample_assumptions.json");

    fn single_tenant_deal() -> Assumptions {
        Assumptions::from_value(json!({
            "holdMonths": 12,
            "purchasePrice": 3_000_000,
            "opexRatio": 0.3,
            "reservesMonthly": 0,
            "exitCapRate": 0.065,
            "tenants": [{ "currentRent": 30, "sf": 1000, "expMonth": 100 }],
            "debt": { "initialLtv": 0 }
        }))
        .unwrap()
    }

    #[test]
    fn test_single_tenant_never_rolls() {
        let result = ProjectionEngine::default().project(&single_tenant_deal());

        assert_eq!(result.monthly.len(), 12);
        assert_eq!(result.annual.len(), 1);
        for row in &result.monthly {
            assert_relative_eq!(row.gross_rent, 30_000.0);
            assert_relative_eq!(row.noi, 21_000.0);
            assert_relative_eq!(row.unlevered_cf, 21_000.0);
            assert_relative_eq!(row.levered_cf, 21_000.0);
            assert_eq!(row.leasing_costs, 0.0);
        }

        let expected_terminal = 21_000.0 * 12.0 / 0.065;
        assert_relative_eq!(result.metrics.terminal_value, expected_terminal);
        assert_abs_diff_eq!(result.metrics.terminal_value, 3_876_923.08, epsilon = 0.01);

        // Unlevered deal: levered profit is entry outlay plus operations plus sale
        let operations: f64 = result.monthly.iter().map(|r| r.levered_cf).sum();
        assert_relative_eq!(
            result.metrics.levered_profit,
            -3_000_000.0 + operations + result.metrics.net_sale_proceeds,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_sample_projection() {
        let assumptions = Assumptions::from_json_str(SAMPLE).unwrap();
        let result = ProjectionEngine::default().project(&assumptions);

        assert_eq!(result.monthly.len(), 60);
        assert_eq!(result.annual.len(), 5);
        assert!(result.metrics.terminal_value > 0.0);
        assert!(result.metrics.unlevered_irr > -1.0);
        assert!(result.metrics.unlevered_irr < 1.0);
        assert!(matches!(
            result.metrics.unlevered_irr_status,
            IrrStatus::Converged | IrrStatus::IterationLimit
        ));

        // Northwind Legal expires at 18 and renews: costs land in month 19 only
        assert!(result.monthly[18].leasing_costs > 0.0);
        assert_eq!(result.monthly[19].leasing_costs, 0.0);
    }

    #[test]
    fn test_long_hold_late_rollover_irr_is_a_root() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": 240,
            "purchasePrice": 5_000_000,
            "opexRatio": 0.3,
            "exitCapRate": 0.065,
            "tenants": [{ "mlaName": "Office", "currentRent": 3.0, "sf": 20_000, "expMonth": 236 }],
            "mlas": [{
                "name": "Office",
                "marketRent": 3.5,
                "renewalProbability": 0.2,
                "tiNew": 60,
                "lcNew": 0.05,
                "freeRentNew": 3
            }]
        }))
        .unwrap();
        let result = ProjectionEngine::default().project(&assumptions);
        assert_eq!(result.monthly.len(), 240);
        assert_relative_eq!(result.monthly[236].leasing_costs, 1_200_000.0);

        let final_noi = result.monthly[239].noi;
        assert_relative_eq!(final_noi, 49_000.0);
        let exit = ExitValuation::from_final_noi(final_noi, 0.065, DEFAULT_SALE_COST_RATE);
        let series = unlevered_series(&assumptions, &result.monthly, &exit);
        assert!(npv(&series, -0.95).is_nan());

        let metrics = &result.metrics;
        assert!(matches!(
            metrics.unlevered_irr_status,
            IrrStatus::Converged | IrrStatus::IterationLimit
        ));
        assert!(metrics.unlevered_irr > 0.0 && metrics.unlevered_irr < 0.05);
        assert_abs_diff_eq!(npv(&series, metrics.unlevered_irr), 0.0, epsilon = 1e-3);
        assert_eq!(metrics.levered_irr, metrics.unlevered_irr);
    }

    #[test]
    fn test_loan_frozen_after_funding_end() {
        let assumptions = Assumptions::from_json_str(SAMPLE).unwrap();
        let result = ProjectionEngine::default().project(&assumptions);
        let funding_end = assumptions.debt.funding_end_month as usize;

        let frozen = result.monthly[funding_end - 1].loan_balance;
        for row in &result.monthly[funding_end..] {
            assert_eq!(row.reimbursement, 0.0);
            assert_eq!(row.loan_balance, frozen);
        }
        assert_eq!(result.metrics.exit_loan_balance, frozen);
        assert!(frozen > result.metrics.initial_loan);
    }

    #[test]
    fn test_hold_costs() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": 24,
            "closingCosts": 50_000,
            "reservesMonthly": 1_000,
            "capexSchedule": { "2": 10_000, "30": 99_999 }
        }))
        .unwrap();
        let result = ProjectionEngine::default().project(&assumptions);

        // Capex beyond the hold never lands
        assert_relative_eq!(result.metrics.total_hold_costs, 50_000.0 + 24_000.0 + 10_000.0);
        assert_eq!(result.monthly[1].capex, 10_000.0);
        assert_relative_eq!(result.monthly[1].unlevered_cf, -11_000.0);
    }

    #[test]
    fn test_sale_cost_override() {
        let config = ProjectionConfig {
            sale_cost_rate: 0.02,
            ..Default::default()
        };
        let engine = ProjectionEngine::new(config);
        assert_eq!(engine.config().sale_cost_rate, 0.02);
        assert_eq!(engine.config().renewal_threshold, DEFAULT_RENEWAL_THRESHOLD);

        let result = engine.project(&single_tenant_deal());
        assert_relative_eq!(
            result.metrics.net_sale_proceeds,
            result.metrics.terminal_value * 0.98
        );
    }

    #[test]
    fn test_unknown_tranche_holds_rent_flat() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": 24,
            "tenants": [{ "mlaName": "Missing", "currentRent": 2.0, "sf": 500, "expMonth": 6 }]
        }))
        .unwrap();
        let result = ProjectionEngine::default().project(&assumptions);
        assert!(result.monthly.iter().all(|r| r.gross_rent == 1_000.0));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_row_counts_match_hold(
            hold_months in 1u32..150,
            exp_month in 0i64..160,
            renewal_pct in 0u32..100,
            free_rent in 0i64..8,
        ) {
            let renewal_probability = f64::from(renewal_pct) / 100.0;
            let assumptions = Assumptions::from_value(json!({
                "holdMonths": hold_months,
                "purchasePrice": 5_000_000,
                "opexRatio": 0.35,
                "tenants": [{ "mlaName": "Office", "currentRent": 2.5, "sf": 2_000, "expMonth": exp_month }],
                "mlas": [{
                    "name": "Office",
                    "marketRent": 2.75,
                    "renewalProbability": renewal_probability,
                    "tiNew": 40, "tiRenewal": 15,
                    "lcNew": 0.06, "lcRenewal": 0.03,
                    "freeRentNew": free_rent, "freeRentRenewal": free_rent,
                    "growth": [0.0, 0.03]
                }],
                "debt": { "initialLtv": 0.55, "spread": 0.03, "indexRate": 0.04,
                          "fundingEndMonth": 24, "futureTilcPct": 1.0 }
            }))
            .unwrap();

            let result = ProjectionEngine::default().project(&assumptions);
            prop_assert_eq!(result.monthly.len(), hold_months as usize);
            prop_assert_eq!(result.annual.len(), (hold_months / 12) as usize);

            // Leasing costs fire in exactly one month when the lease rolls inside the hold
            let event_months = result.monthly.iter().filter(|r| r.leasing_costs > 0.0).count();
            let rolls = exp_month + 1 <= i64::from(hold_months);
            prop_assert_eq!(event_months, usize::from(rolls));

            // Free rent: zero rent from the first post-expiry month through the window
            for row in &result.monthly {
                let post_exp = i64::from(row.month) - exp_month;
                if post_exp >= 1 && post_exp <= free_rent {
                    prop_assert_eq!(row.gross_rent, 0.0);
                }
            }

            // No draws after the funding end month
            for pair in result.monthly.windows(2) {
                if pair[1].month > 24 {
                    prop_assert!(pair[1].loan_balance == pair[0].loan_balance);
                }
            }
        }
    }
}
