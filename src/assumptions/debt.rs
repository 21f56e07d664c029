//! Acquisition loan terms

/// Floating-rate acquisition loan with future-funding reimbursements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebtTerms {
    /// Loan amount as a fraction of purchase price at closing
    pub initial_ltv: f64,
    /// Annual spread over the index
    pub spread: f64,
    /// Annual index rate (e.g. SOFR)
    pub index_rate: f64,
    /// Origination fee as a fraction of the initial loan
    pub origination_fee: f64,
    /// Last month (inclusive) in which the lender reimburses leasing costs and capex
    pub funding_end_month: i64,
    /// Share of leasing costs (TI/LC) funded by the lender
    pub future_tilc_pct: f64,
    /// Share of capex funded by the lender
    pub future_capex_pct: f64,
    /// Name of the rate index, reporting only
    pub rate_index: Option<String>,
    /// "Fixed" / "Floating", reporting only
    pub fixed_floating: Option<String>,
}

impl DebtTerms {
    /// Loan funded at closing
    pub fn initial_loan(&self, purchase_price: f64) -> f64 {
        purchase_price * self.initial_ltv
    }

    /// Simple periodic rate: (spread + index) / 12
    pub fn monthly_rate(&self) -> f64 {
        (self.spread + self.index_rate) / 12.0
    }

    /// Whether the lender still funds reimbursements in `month`
    pub fn funds_month(&self, month: u32) -> bool {
        i64::from(month) <= self.funding_end_month
    }

    /// Lender reimbursement for a month's leasing costs and capex
    pub fn reimbursement(&self, leasing_costs: f64, capex: f64) -> f64 {
        self.future_tilc_pct * leasing_costs + self.future_capex_pct * capex
    }

    /// Equity-side proceeds at closing: loan net of origination fee
    pub fn net_loan_proceeds(&self, purchase_price: f64) -> f64 {
        self.initial_loan(purchase_price) * (1.0 - self.origination_fee)
    }
}
