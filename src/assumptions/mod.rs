//! Underwriting assumptions: rent roll, lease tranches, debt, capital plan, exit

mod debt;
mod numeric;
mod tranche;
pub mod loader;

pub use debt::DebtTerms;
pub use numeric::Numeric;
pub use tranche::{
    GrowthCurve, LeaseScenario, LeaseTerms, LeaseTranche, DEFAULT_LEASE_TERM_MONTHS, GROWTH_YEARS,
};
pub use loader::{load_assumptions, load_assumptions_from_reader};

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::Result;

/// Exit cap rate used when the input omits one
pub const DEFAULT_EXIT_CAP_RATE: f64 = 0.065;

/// An in-place tenant on the rent roll
#[derive(Debug, Clone, PartialEq)]
pub struct Tenant {
    pub name: String,
    /// Lease tranche governing what happens at expiration
    pub tranche: Option<String>,
    /// Leased area in square feet
    pub sf: f64,
    /// Contractual rent per square foot per month
    pub current_rent: f64,
    /// Expiration month relative to projection start; may lie beyond the hold
    pub exp_month: i64,
}

/// Capital expenditures by projection month; absent months spend nothing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapexSchedule(BTreeMap<i64, f64>);

impl CapexSchedule {
    pub fn new(entries: BTreeMap<i64, f64>) -> Self {
        Self(entries)
    }

    pub fn amount(&self, month: u32) -> f64 {
        self.0.get(&i64::from(month)).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Fully resolved assumptions for one underwriting run
///
/// Every optional input has already been replaced by its default; the
/// projection never consults raw input.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub acquisition_date: Option<NaiveDate>,
    /// Given sale date, or acquisition date plus the hold period
    pub sale_date: Option<NaiveDate>,
    pub hold_months: u32,
    pub gross_sf: Option<f64>,
    pub purchase_price: f64,
    pub closing_costs: f64,
    /// Operating expenses as a fraction of gross rent
    pub opex_ratio: f64,
    pub reserves_monthly: f64,
    pub capex_schedule: CapexSchedule,
    pub exit_cap_rate: f64,
    pub tenants: Vec<Tenant>,
    pub tranches: Vec<LeaseTranche>,
    pub debt: DebtTerms,
    /// A refinance block was supplied; reported, not modeled
    pub refinance_enabled: bool,
}

impl Assumptions {
    /// Parse and validate an assumptions JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        loader::RawAssumptions::parse(json)?.into_assumptions()
    }

    /// Validate an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        loader::RawAssumptions::from_value(value)?.into_assumptions()
    }

    /// Look up a tranche by name; the last definition of a name wins
    pub fn tranche(&self, name: &str) -> Option<&LeaseTranche> {
        self.tranches.iter().rev().find(|t| t.name == name)
    }

    /// Debt funded at closing
    pub fn initial_loan(&self) -> f64 {
        self.debt.initial_loan(self.purchase_price)
    }

    /// Total acquisition cost, purchase price plus closing costs
    pub fn all_in_cost(&self) -> f64 {
        self.purchase_price + self.closing_costs
    }
}
