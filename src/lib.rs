//! Underwriting Model - monthly cash-flow projection for income-producing real estate
//!
//! This library provides:
//! - Assumptions loading and validation (rent roll, lease tranches, debt, capex)
//! - Lease rollover with deterministic renewal / new-lease selection
//! - Monthly operations, interest-only debt with lender reimbursements
//! - Exit valuation, IRR, equity multiples and annual rollups
//! - Underwriting memo and JSON/CSV snapshot writers

pub mod assumptions;
pub mod error;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{load_assumptions, Assumptions, DebtTerms, LeaseTranche, Tenant};
pub use error::{Result, UnderwritingError};
pub use projection::{Metrics, MonthlyRow, ProjectionConfig, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioRunner;
