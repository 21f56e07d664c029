//! Lease tranche (MLA) templates: market leasing economics shared by tenants

use serde::{Deserialize, Serialize};

/// Number of annual slots in a rent growth curve
pub const GROWTH_YEARS: usize = 10;

/// Default lease term for rolled leases (months)
pub const DEFAULT_LEASE_TERM_MONTHS: i64 = 60;

/// Which set of leasing terms applies once a lease expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseScenario {
    /// Existing tenant renews
    Renewal,
    /// Space is re-let to a new tenant
    NewLease,
}

/// Economics for one leasing scenario
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LeaseTerms {
    /// Tenant improvement allowance per square foot
    pub ti_psf: f64,
    /// Leasing commission rate, applied to total rent over the lease term
    pub lc_rate: f64,
    /// Free-rent months at the start of the rolled lease
    pub free_rent_months: i64,
}

/// Annual rent growth multipliers indexed by elapsed year
///
/// Slot 0 is the baseline year and is never applied. Slots 1..=9 compound in
/// order as full years elapse from projection start.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GrowthCurve([f64; GROWTH_YEARS]);

impl GrowthCurve {
    pub fn new(rates: [f64; GROWTH_YEARS]) -> Self {
        Self(rates)
    }

    /// Build from a loosely sized list: short lists repeat their last rate,
    /// long lists are cut at ten years.
    pub fn from_rates(rates: &[f64]) -> Self {
        let mut curve = [0.0; GROWTH_YEARS];
        let fill = rates.last().copied().unwrap_or(0.0);
        for (slot, value) in curve.iter_mut().enumerate() {
            *value = rates.get(slot).copied().unwrap_or(fill);
        }
        Self(curve)
    }

    /// Growth rate for a given year slot (0 outside the curve)
    pub fn rate(&self, year: usize) -> f64 {
        self.0.get(year).copied().unwrap_or(0.0)
    }

    /// Cumulative growth factor after `elapsed_years` full years, capped at year 9
    pub fn factor(&self, elapsed_years: u32) -> f64 {
        let years = (elapsed_years as usize).min(GROWTH_YEARS - 1);
        self.0[1..=years].iter().map(|g| 1.0 + g).product()
    }
}

/// A named lease tranche template
#[derive(Debug, Clone, PartialEq)]
pub struct LeaseTranche {
    pub name: String,
    /// Market rent per square foot; tenants keep their in-place rent when unset
    pub market_rent: Option<f64>,
    /// Probability the in-place tenant renews (0..1)
    pub renewal_probability: f64,
    pub new_lease: LeaseTerms,
    pub renewal: LeaseTerms,
    pub lease_term_months: i64,
    pub growth: GrowthCurve,
}

impl LeaseTranche {
    /// Terms for the given scenario
    pub fn terms(&self, scenario: LeaseScenario) -> &LeaseTerms {
        match scenario {
            LeaseScenario::Renewal => &self.renewal,
            LeaseScenario::NewLease => &self.new_lease,
        }
    }

    /// Market rent, falling back to the tenant's in-place rent
    pub fn market_rent_or(&self, in_place_rent: f64) -> f64 {
        self.market_rent.unwrap_or(in_place_rent)
    }
}
