//! Monthly property projection: rollover, operations, debt, returns

mod cashflows;
mod debt;
mod engine;
mod irr;
mod metrics;
mod rollover;
mod state;

pub use cashflows::{AnnualRow, MonthlyRow, ProjectionResult, MONTHS_PER_YEAR};
pub use debt::DebtServiceCalculator;
pub use engine::{ProjectionConfig, ProjectionEngine, DEFAULT_SALE_COST_RATE};
pub use irr::{irr, npv, solve_irr, IrrSolution, IrrStatus, SolverConfig};
pub use metrics::{equity_multiple, levered_series, unlevered_series, ExitValuation, Metrics};
pub use rollover::{elapsed_years, LeaseRollover, RolloverEvent, TenantMonth, DEFAULT_RENEWAL_THRESHOLD};
pub use state::LoanState;
