//! Internal Rate of Return (IRR) calculation
//!
//! Bisection on periodic NPV with upward bracket expansion. The rate is per
//! period of the input series (monthly for a monthly projection).

use serde::{Deserialize, Serialize};

/// Solver limits and starting bracket
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Initial lower bound (periodic rate)
    pub low: f64,
    /// Initial upper bound (periodic rate)
    pub high: f64,
    /// Amount added to the upper bound per expansion
    pub expansion_step: f64,
    /// Maximum number of upper-bound expansions
    pub max_expansions: u32,
    /// Maximum number of bisection iterations
    pub max_iterations: u32,
    /// Early exit when |NPV| at the midpoint falls below this
    pub tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            low: -0.95,
            high: 1.5,
            expansion_step: 1.0,
            max_expansions: 20,
            max_iterations: 120,
            tolerance: 1e-8,
        }
    }
}

/// How the solver finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrStatus {
    /// |NPV| fell below tolerance
    Converged,
    /// Bisection budget spent; rate is the final bracket midpoint
    IterationLimit,
    /// No sign change found; rate is reported as 0.0
    Unbracketed,
    /// Empty or all-zero series; every rate is a root and the first bisection
    /// midpoint is reported
    Degenerate,
}

/// Solver output: the rate plus how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolution {
    pub rate: f64,
    pub status: IrrStatus,
}

impl IrrSolution {
    /// True when the rate is a root of a series with a sign change
    pub fn is_root(&self) -> bool {
        matches!(self.status, IrrStatus::Converged | IrrStatus::IterationLimit)
    }
}

/// Net present value at a periodic rate, `cf / (1 + r)^t` with t = 0 undiscounted
pub fn npv(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .filter(|(_, &cf)| cf != 0.0)
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Sign of NPV at `rate` as -1.0, 0.0 or 1.0, for rates above -100%
///
/// Long series overflow `npv` near -100% (`cf / 0.05^240` is infinite). There
/// the value at the horizon, `sum(cf * (1 + r)^(N - t))`, is used instead: it
/// is NPV scaled by a positive factor and stays finite for negative rates.
fn npv_sign(cashflows: &[f64], rate: f64) -> f64 {
    let value = npv(cashflows, rate);
    let value = if value.is_finite() {
        value
    } else {
        let horizon = cashflows.len().saturating_sub(1);
        cashflows
            .iter()
            .enumerate()
            .filter(|(_, &cf)| cf != 0.0)
            .map(|(t, &cf)| cf * (1.0 + rate).powi((horizon - t) as i32))
            .sum()
    };

    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Solve for the periodic IRR of a cash-flow series
pub fn solve_irr(cashflows: &[f64], config: &SolverConfig) -> IrrSolution {
    if cashflows.iter().all(|&cf| cf == 0.0) {
        // NPV is zero everywhere, so bisection stops at its first midpoint
        return IrrSolution {
            rate: (config.low + config.high) / 2.0,
            status: IrrStatus::Degenerate,
        };
    }

    let mut low = config.low;
    let mut high = config.high;
    let mut sign_low = npv_sign(cashflows, low);
    let mut sign_high = npv_sign(cashflows, high);

    let mut expansions = 0;
    while sign_low * sign_high > 0.0 && expansions < config.max_expansions {
        high += config.expansion_step;
        sign_high = npv_sign(cashflows, high);
        expansions += 1;
    }

    if sign_low * sign_high > 0.0 {
        return IrrSolution {
            rate: 0.0,
            status: IrrStatus::Unbracketed,
        };
    }

    for _ in 0..config.max_iterations {
        let mid = (low + high) / 2.0;

        if npv(cashflows, mid).abs() < config.tolerance {
            return IrrSolution {
                rate: mid,
                status: IrrStatus::Converged,
            };
        }

        let sign_mid = npv_sign(cashflows, mid);
        if sign_low * sign_mid < 0.0 {
            high = mid;
        } else {
            low = mid;
            sign_low = sign_mid;
        }
    }

    IrrSolution {
        rate: (low + high) / 2.0,
        status: IrrStatus::IterationLimit,
    }
}

/// Periodic IRR with default solver settings; 0.0 when no root is bracketed
pub fn irr(cashflows: &[f64]) -> f64 {
    solve_irr(cashflows, &SolverConfig::default()).rate
}
