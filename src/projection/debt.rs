//! Debt service pass over completed monthly rows
//!
//! Interest-only on a draw-down loan: each month pays interest on the opening
//! balance, and through the funding end month the lender reimburses a share of
//! leasing costs and capex, which is added to the balance and credited to
//! levered cash flow.

use log::debug;

use super::cashflows::MonthlyRow;
use super::state::LoanState;
use crate::assumptions::DebtTerms;

/// Sequential debt service calculator
#[derive(Debug, Clone)]
pub struct DebtServiceCalculator<'a> {
    terms: &'a DebtTerms,
    monthly_rate: f64,
}

impl<'a> DebtServiceCalculator<'a> {
    pub fn new(terms: &'a DebtTerms) -> Self {
        Self {
            terms,
            monthly_rate: terms.monthly_rate(),
        }
    }

    /// Apply one month: debt service, reimbursement, levered cash flow
    pub fn step(&self, state: &mut LoanState, row: &mut MonthlyRow) {
        let debt_service = state.interest(self.monthly_rate);

        let reimbursement = if self.terms.funds_month(row.month) {
            self.terms.reimbursement(row.leasing_costs, row.capex)
        } else {
            0.0
        };
        if reimbursement != 0.0 {
            debug!(
                "Month {}: lender funds {:.2} (balance {:.2} -> {:.2})",
                row.month,
                reimbursement,
                state.balance,
                state.balance + reimbursement
            );
        }
        state.draw(row.month, reimbursement);

        row.debt_service = debt_service;
        row.reimbursement = reimbursement;
        row.loan_balance = state.balance;
        row.levered_cf = row.unlevered_cf - debt_service + reimbursement;
    }

    /// Thread the loan state through every row in month order and return the
    /// balance outstanding at exit
    pub fn run(&self, mut state: LoanState, rows: &mut [MonthlyRow]) -> LoanState {
        for row in rows.iter_mut() {
            self.step(&mut state, row);
        }
        state
    }
}
