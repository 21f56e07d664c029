//! Loan balance carried across the monthly loop

use crate::assumptions::DebtTerms;

/// The only state that crosses month boundaries in a projection
#[derive(Debug, Clone, PartialEq)]
pub struct LoanState {
    /// Balance at closing
    pub initial_balance: f64,

    /// Current outstanding balance
    pub balance: f64,

    /// Cumulative lender reimbursements drawn since closing
    pub total_draws: f64,

    /// Last month a non-zero draw was funded
    pub last_draw_month: Option<u32>,
}

impl LoanState {
    /// Initialize at closing: purchase price x initial LTV
    pub fn at_closing(terms: &DebtTerms, purchase_price: f64) -> Self {
        let initial_balance = terms.initial_loan(purchase_price);
        Self {
            initial_balance,
            balance: initial_balance,
            total_draws: 0.0,
            last_draw_month: None,
        }
    }

    /// Interest-only debt service on the current balance
    pub fn interest(&self, monthly_rate: f64) -> f64 {
        if self.balance == 0.0 {
            0.0
        } else {
            self.balance * monthly_rate
        }
    }

    /// Fund a reimbursement draw; the loan grows, it never amortizes
    pub fn draw(&mut self, month: u32, amount: f64) {
        self.balance += amount;
        self.total_draws += amount;
        if amount != 0.0 {
            self.last_draw_month = Some(month);
        }
    }
}
