//! Return metrics from completed monthly rows

use serde::{Deserialize, Serialize};

use super::cashflows::MonthlyRow;
use super::irr::{solve_irr, IrrStatus, SolverConfig};
use super::state::LoanState;
use crate::assumptions::Assumptions;

/// Summary metrics for one run, flattened to named scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Monthly IRR of the unlevered series
    pub unlevered_irr: f64,
    /// Monthly IRR of the levered series
    pub levered_irr: f64,
    pub unlevered_equity_multiple: f64,
    pub levered_equity_multiple: f64,
    /// Sum of the whole levered series, entry equity included
    pub levered_profit: f64,
    /// Final-month NOI x 12 / exit cap rate
    pub terminal_value: f64,
    /// Closing costs plus leasing costs, capex and reserves over the hold
    pub total_hold_costs: f64,
    /// Terminal value net of the sale cost load
    pub net_sale_proceeds: f64,
    pub initial_loan: f64,
    /// Loan repaid from sale proceeds
    pub exit_loan_balance: f64,
    pub unlevered_irr_status: IrrStatus,
    pub levered_irr_status: IrrStatus,
}

/// Exit value and sale proceeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitValuation {
    pub terminal_value: f64,
    pub net_sale_proceeds: f64,
}

impl ExitValuation {
    /// Capitalize the final month's annualized NOI and deduct the sale cost load
    pub fn from_final_noi(final_noi: f64, exit_cap_rate: f64, sale_cost_rate: f64) -> Self {
        let terminal_value = final_noi * 12.0 / exit_cap_rate;
        Self {
            terminal_value,
            net_sale_proceeds: terminal_value * (1.0 - sale_cost_rate),
        }
    }
}

/// Time-0 all-in cost, then monthly unlevered cash flow with sale proceeds at exit
pub fn unlevered_series(
    assumptions: &Assumptions,
    monthly: &[MonthlyRow],
    exit: &ExitValuation,
) -> Vec<f64> {
    let mut series = Vec::with_capacity(monthly.len() + 1);
    series.push(-assumptions.all_in_cost());
    series.extend(monthly.iter().map(|r| r.unlevered_cf));
    if !monthly.is_empty() {
        if let Some(last) = series.last_mut() {
            *last += exit.net_sale_proceeds;
        }
    }
    series
}

/// Time-0 equity after net loan proceeds, then monthly levered cash flow with
/// sale proceeds less the loan payoff at exit
pub fn levered_series(
    assumptions: &Assumptions,
    monthly: &[MonthlyRow],
    exit: &ExitValuation,
    loan: &LoanState,
) -> Vec<f64> {
    let entry_equity =
        assumptions.all_in_cost() - assumptions.debt.net_loan_proceeds(assumptions.purchase_price);

    let mut series = Vec::with_capacity(monthly.len() + 1);
    series.push(-entry_equity);
    series.extend(monthly.iter().map(|r| r.levered_cf));
    if !monthly.is_empty() {
        if let Some(last) = series.last_mut() {
            *last += exit.net_sale_proceeds - loan.balance;
        }
    }
    series
}

/// Distributions after time 0 over the time-0 outlay; 0.0 when nothing was invested
pub fn equity_multiple(series: &[f64]) -> f64 {
    match series.split_first() {
        Some((&entry, rest)) if entry != 0.0 => rest.iter().sum::<f64>() / -entry,
        _ => 0.0,
    }
}

impl Metrics {
    /// Derive all metrics once, from the finished rows and the exit loan state
    pub fn aggregate(
        assumptions: &Assumptions,
        monthly: &[MonthlyRow],
        loan: &LoanState,
        sale_cost_rate: f64,
        solver: &SolverConfig,
    ) -> Self {
        let final_noi = monthly.last().map_or(0.0, |r| r.noi);
        let exit = ExitValuation::from_final_noi(final_noi, assumptions.exit_cap_rate, sale_cost_rate);

        let unlevered = unlevered_series(assumptions, monthly, &exit);
        let levered = levered_series(assumptions, monthly, &exit, loan);

        let unlevered_irr = solve_irr(&unlevered, solver);
        let levered_irr = solve_irr(&levered, solver);

        let total_hold_costs = assumptions.closing_costs
            + monthly
                .iter()
                .map(|r| r.leasing_costs + r.capex + r.reserves)
                .sum::<f64>();

        Self {
            unlevered_irr: unlevered_irr.rate,
            levered_irr: levered_irr.rate,
            unlevered_equity_multiple: equity_multiple(&unlevered),
            levered_equity_multiple: equity_multiple(&levered),
            levered_profit: levered.iter().sum(),
            terminal_value: exit.terminal_value,
            total_hold_costs,
            net_sale_proceeds: exit.net_sale_proceeds,
            initial_loan: loan.initial_balance,
            exit_loan_balance: loan.balance,
            unlevered_irr_status: unlevered_irr.status,
            levered_irr_status: levered_irr.status,
        }
    }
}
