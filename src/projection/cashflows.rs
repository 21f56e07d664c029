//! Cashflow output structures for projections

use serde::{Deserialize, Serialize};

use super::metrics::Metrics;

/// Months per annual rollup block
pub const MONTHS_PER_YEAR: usize = 12;

/// A single row of projection output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRow {
    /// Projection month (1-indexed)
    pub month: u32,

    // Operations
    pub gross_rent: f64,
    pub opex: f64,
    pub noi: f64,

    // Capital
    pub leasing_costs: f64,
    pub capex: f64,
    pub reserves: f64,
    pub unlevered_cf: f64,

    // Financing, filled in by the debt service pass
    pub debt_service: f64,
    pub reimbursement: f64,
    /// Loan balance after this month's draw
    pub loan_balance: f64,
    pub levered_cf: f64,
}

impl MonthlyRow {
    /// Create a new row with zeroed amounts
    pub fn new(month: u32) -> Self {
        Self {
            month,
            gross_rent: 0.0,
            opex: 0.0,
            noi: 0.0,
            leasing_costs: 0.0,
            capex: 0.0,
            reserves: 0.0,
            unlevered_cf: 0.0,
            debt_service: 0.0,
            reimbursement: 0.0,
            loan_balance: 0.0,
            levered_cf: 0.0,
        }
    }
}

/// Twelve-month rollup of monthly rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRow {
    /// Hold year (1-indexed)
    pub year: u32,
    #[serde(rename = "annual_gross_rent")]
    pub gross_rent: f64,
    #[serde(rename = "annual_noi")]
    pub noi: f64,
    #[serde(rename = "annual_leasing_costs")]
    pub leasing_costs: f64,
    #[serde(rename = "annual_capex")]
    pub capex: f64,
    #[serde(rename = "annual_debt_service")]
    pub debt_service: f64,
    #[serde(rename = "annual_unlevered_cf")]
    pub unlevered_cf: f64,
    #[serde(rename = "annual_levered_cf")]
    pub levered_cf: f64,
}

impl AnnualRow {
    /// Sum full 12-month blocks; trailing partial years are left out
    pub fn rollup(monthly: &[MonthlyRow]) -> Vec<AnnualRow> {
        monthly
            .chunks_exact(MONTHS_PER_YEAR)
            .zip(1u32..)
            .map(|(rows, year)| AnnualRow {
                year,
                gross_rent: rows.iter().map(|r| r.gross_rent).sum(),
                noi: rows.iter().map(|r| r.noi).sum(),
                leasing_costs: rows.iter().map(|r| r.leasing_costs).sum(),
                capex: rows.iter().map(|r| r.capex).sum(),
                debt_service: rows.iter().map(|r| r.debt_service).sum(),
                unlevered_cf: rows.iter().map(|r| r.unlevered_cf).sum(),
                levered_cf: rows.iter().map(|r| r.levered_cf).sum(),
            })
            .collect()
    }
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Monthly rows, one per hold month
    pub monthly: Vec<MonthlyRow>,

    /// Annual rollups, one per full hold year
    pub annual: Vec<AnnualRow>,

    /// Return metrics over the whole hold
    pub metrics: Metrics,
}
