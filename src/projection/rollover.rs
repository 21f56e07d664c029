//! Lease rollover: rent in force for a tenant-month and one-time leasing costs
//!
//! Before expiry the contract rent applies. After expiry the space is treated as
//! re-leased on tranche terms: a free-rent window, then market rent grown by the
//! tranche's curve. TI and LC are paid once, in the first month after expiry.

use log::debug;

use crate::assumptions::{LeaseScenario, LeaseTranche, Tenant};

/// Renewal probability at or above which a rollover is modeled as a renewal
pub const DEFAULT_RENEWAL_THRESHOLD: f64 = 0.5;

/// One-time leasing costs triggered by a rollover
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RolloverEvent {
    pub scenario: LeaseScenario,
    /// Tenant improvements: area x TI per square foot
    pub ti_cost: f64,
    /// Leasing commission: area x rent x term x LC rate
    pub lc_cost: f64,
}

impl RolloverEvent {
    pub fn total(&self) -> f64 {
        self.ti_cost + self.lc_cost
    }
}

/// Result of evaluating one tenant in one month
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TenantMonth {
    /// Rent per square foot in force this month
    pub rent_psf: f64,
    /// Rent contribution: rent per square foot x area
    pub rent: f64,
    /// Set only in the first month after expiry
    pub event: Option<RolloverEvent>,
}

impl TenantMonth {
    pub fn leasing_costs(&self) -> f64 {
        self.event.map_or(0.0, |e| e.total())
    }
}

/// Full years elapsed since projection start for a 1-indexed month
pub fn elapsed_years(month: u32) -> u32 {
    month.saturating_sub(1) / 12
}

/// Deterministic lease rollover rules
#[derive(Debug, Clone, Copy)]
pub struct LeaseRollover {
    renewal_threshold: f64,
}

impl Default for LeaseRollover {
    fn default() -> Self {
        Self::new(DEFAULT_RENEWAL_THRESHOLD)
    }
}

impl LeaseRollover {
    pub fn new(renewal_threshold: f64) -> Self {
        Self { renewal_threshold }
    }

    /// Renewal probability is a hard threshold, never a random draw
    pub fn scenario(&self, tranche: &LeaseTranche) -> LeaseScenario {
        if tranche.renewal_probability >= self.renewal_threshold {
            LeaseScenario::Renewal
        } else {
            LeaseScenario::NewLease
        }
    }

    /// Rent and leasing costs for `tenant` in `month`
    pub fn tenant_month(
        &self,
        tenant: &Tenant,
        tranche: Option<&LeaseTranche>,
        month: u32,
    ) -> TenantMonth {
        let in_place = TenantMonth {
            rent_psf: tenant.current_rent,
            rent: tenant.current_rent * tenant.sf,
            event: None,
        };

        let tranche = match tranche {
            Some(tranche) if i64::from(month) > tenant.exp_month => tranche,
            _ => return in_place,
        };

        let post_exp = i64::from(month) - tenant.exp_month;
        let scenario = self.scenario(tranche);
        let terms = tranche.terms(scenario);

        let rent_psf = if post_exp <= terms.free_rent_months {
            0.0
        } else {
            tranche.market_rent_or(tenant.current_rent) * tranche.growth.factor(elapsed_years(month))
        };

        let event = (post_exp == 1).then(|| {
            let event = RolloverEvent {
                scenario,
                ti_cost: tenant.sf * terms.ti_psf,
                lc_cost: tenant.sf * rent_psf * tranche.lease_term_months as f64 * terms.lc_rate,
            };
            debug!(
                "Month {}: {} rolls to {:?} under {} (TI {:.2}, LC {:.2})",
                month, tenant.name, scenario, tranche.name, event.ti_cost, event.lc_cost
            );
            event
        });

        TenantMonth {
            rent_psf,
            rent: rent_psf * tenant.sf,
            event,
        }
    }
}
