//! JSON assumption loader
//!
//! Raw records mirror the input document field for field; `into_assumptions`
//! resolves every default once and rejects structurally invalid input.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Months, NaiveDate};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::numeric::{self, Numeric};
use super::{
    Assumptions, CapexSchedule, DebtTerms, GrowthCurve, LeaseTerms, LeaseTranche, Tenant,
    DEFAULT_EXIT_CAP_RATE, DEFAULT_LEASE_TERM_MONTHS,
};
use crate::error::{Result, UnderwritingError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw assumptions document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAssumptions {
    #[serde(default)]
    acquisition_date: Option<String>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    hold_months: Option<i64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    gross_sf: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    closing_costs: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    opex_ratio: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    reserves_monthly: Option<f64>,
    #[serde(default)]
    capex_schedule: Option<BTreeMap<String, Option<Numeric>>>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    exit_cap_rate: Option<f64>,
    #[serde(default)]
    sale_date: Option<String>,
    #[serde(default)]
    tenants: Option<Vec<RawTenant>>,
    #[serde(default)]
    mlas: Option<Vec<RawTranche>>,
    #[serde(default)]
    debt: Option<RawDebt>,
    #[serde(default)]
    refinance: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTenant {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    mla_name: Option<String>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    current_rent: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    sf: Option<f64>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    exp_month: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTranche {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    market_rent: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    renewal_probability: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    ti_new: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    ti_renewal: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    lc_new: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    lc_renewal: Option<f64>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    lease_term: Option<i64>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    free_rent_new: Option<i64>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    free_rent_renewal: Option<i64>,
    #[serde(default, deserialize_with = "numeric::f64_seq_opt")]
    growth: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDebt {
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    initial_ltv: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    spread: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    index_rate: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    origination_fee: Option<f64>,
    #[serde(default, deserialize_with = "numeric::i64_opt")]
    funding_end_month: Option<i64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    future_tilc_pct: Option<f64>,
    #[serde(default, deserialize_with = "numeric::f64_opt")]
    future_capex_pct: Option<f64>,
    #[serde(default)]
    rate_index: Option<String>,
    #[serde(default)]
    fixed_floating: Option<String>,
}

impl RawTenant {
    fn into_tenant(self, index: usize, hold_months: u32) -> Tenant {
        Tenant {
            name: self.name.unwrap_or_else(|| format!("Tenant-{}", index + 1)),
            tranche: self.mla_name,
            sf: self.sf.unwrap_or(0.0),
            current_rent: self.current_rent.unwrap_or(0.0),
            // Default expiry lands just past the hold, so the lease never rolls
            exp_month: self.exp_month.unwrap_or(i64::from(hold_months) + 1),
        }
    }
}

impl RawTranche {
    fn into_tranche(self, index: usize) -> LeaseTranche {
        LeaseTranche {
            name: self.name.unwrap_or_else(|| format!("MLA-{}", index + 1)),
            market_rent: self.market_rent,
            renewal_probability: self.renewal_probability.unwrap_or(0.0),
            new_lease: LeaseTerms {
                ti_psf: self.ti_new.unwrap_or(0.0),
                lc_rate: self.lc_new.unwrap_or(0.0),
                free_rent_months: self.free_rent_new.unwrap_or(0),
            },
            renewal: LeaseTerms {
                ti_psf: self.ti_renewal.unwrap_or(0.0),
                lc_rate: self.lc_renewal.unwrap_or(0.0),
                free_rent_months: self.free_rent_renewal.unwrap_or(0),
            },
            lease_term_months: self.lease_term.unwrap_or(DEFAULT_LEASE_TERM_MONTHS),
            growth: GrowthCurve::from_rates(self.growth.as_deref().unwrap_or(&[])),
        }
    }
}

impl RawDebt {
    fn into_terms(self) -> DebtTerms {
        DebtTerms {
            initial_ltv: self.initial_ltv.unwrap_or(0.0),
            spread: self.spread.unwrap_or(0.0),
            index_rate: self.index_rate.unwrap_or(0.0),
            origination_fee: self.origination_fee.unwrap_or(0.0),
            funding_end_month: self.funding_end_month.unwrap_or(0),
            future_tilc_pct: self.future_tilc_pct.unwrap_or(0.0),
            future_capex_pct: self.future_capex_pct.unwrap_or(0.0),
            rate_index: self.rate_index,
            fixed_floating: self.fixed_floating,
        }
    }
}

impl RawAssumptions {
    pub(crate) fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Resolve defaults and validate
    pub(crate) fn into_assumptions(self) -> Result<Assumptions> {
        let hold = self.hold_months.unwrap_or(0);
        let hold_months = u32::try_from(hold)
            .ok()
            .filter(|&months| months > 0)
            .ok_or(UnderwritingError::InvalidHoldPeriod(hold))?;

        let exit_cap_rate = self.exit_cap_rate.unwrap_or(DEFAULT_EXIT_CAP_RATE);
        if exit_cap_rate == 0.0 {
            return Err(UnderwritingError::InvalidInput {
                field: "exitCapRate".into(),
                reason: "must be non-zero to capitalize exit NOI".into(),
            });
        }

        let capex_schedule = parse_capex_schedule(self.capex_schedule.unwrap_or_default())?;

        let acquisition_date = parse_date("acquisitionDate", self.acquisition_date.as_deref())?;
        let sale_date = match parse_date("saleDate", self.sale_date.as_deref())? {
            Some(date) => Some(date),
            None => acquisition_date
                .and_then(|date| date.checked_add_months(Months::new(hold_months))),
        };

        let tranches: Vec<LeaseTranche> = self
            .mlas
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_tranche(i))
            .collect();

        let tenants: Vec<Tenant> = self
            .tenants
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, raw)| raw.into_tenant(i, hold_months))
            .collect();

        for tenant in &tenants {
            if let Some(name) = &tenant.tranche {
                if !tranches.iter().any(|t| &t.name == name) {
                    warn!(
                        "Tenant {} references unknown lease tranche {:?}; in-place rent is held flat",
                        tenant.name, name
                    );
                }
            }
        }

        debug!(
            "Loaded assumptions: {} months, {} tenants, {} tranches, {} capex entries",
            hold_months,
            tenants.len(),
            tranches.len(),
            capex_schedule.len()
        );

        Ok(Assumptions {
            acquisition_date,
            sale_date,
            hold_months,
            gross_sf: self.gross_sf,
            purchase_price: self.purchase_price.unwrap_or(0.0),
            closing_costs: self.closing_costs.unwrap_or(0.0),
            opex_ratio: self.opex_ratio.unwrap_or(0.0),
            reserves_monthly: self.reserves_monthly.unwrap_or(0.0),
            capex_schedule,
            exit_cap_rate,
            tenants,
            tranches,
            debt: self.debt.unwrap_or_default().into_terms(),
            refinance_enabled: self.refinance.as_ref().is_some_and(is_truthy),
        })
    }
}

fn parse_capex_schedule(raw: BTreeMap<String, Option<Numeric>>) -> Result<CapexSchedule> {
    let mut entries = BTreeMap::new();
    for (key, amount) in raw {
        let month: i64 = key.trim().parse().map_err(|_| UnderwritingError::InvalidInput {
            field: "capexSchedule".into(),
            reason: format!("month key {:?} is not an integer", key),
        })?;
        let amount = match amount {
            Some(value) => value.to_f64().map_err(|reason| UnderwritingError::InvalidInput {
                field: format!("capexSchedule[{}]", key),
                reason,
            })?,
            None => 0.0,
        };
        entries.insert(month, amount);
    }
    Ok(CapexSchedule::new(entries))
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|e| UnderwritingError::InvalidInput {
                field: field.into(),
                reason: format!("{:?} is not a YYYY-MM-DD date ({})", text, e),
            }),
    }
}

/// Presence test for the refinance block: empty or false-y values count as absent
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Load assumptions from a JSON file
pub fn load_assumptions<P: AsRef<Path>>(path: P) -> Result<Assumptions> {
    let file = File::open(path)?;
    load_assumptions_from_reader(BufReader::new(file))
}

/// Load assumptions from any reader (e.g., string buffer, network stream)
pub fn load_assumptions_from_reader<R: Read>(reader: R) -> Result<Assumptions> {
    RawAssumptions::from_reader(reader)?.into_assumptions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = include_str!("../../data/sample_assumptions.json");

    #[test]
    fn test_load_sample_assumptions() {
        let assumptions = load_assumptions_from_reader(SAMPLE.as_bytes())
            .expect("Failed to load sample assumptions");

        assert_eq!(assumptions.hold_months, 60);
        assert_eq!(assumptions.tenants.len(), 4);
        assert_eq!(assumptions.tranches.len(), 2);
        assert!(assumptions.tranche("Office Suite").is_some());
        assert!(!assumptions.capex_schedule.is_empty());
        assert!(assumptions.refinance_enabled);
        assert_eq!(
            assumptions.sale_date,
            NaiveDate::from_ymd_opt(2031, 1, 1)
        );
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let assumptions = Assumptions::from_value(json!({ "holdMonths": 24 })).unwrap();

        assert_eq!(assumptions.hold_months, 24);
        assert_eq!(assumptions.purchase_price, 0.0);
        assert_eq!(assumptions.exit_cap_rate, DEFAULT_EXIT_CAP_RATE);
        assert!(assumptions.tenants.is_empty());
        assert!(assumptions.capex_schedule.is_empty());
        assert_eq!(assumptions.debt, DebtTerms::default());
        assert!(assumptions.gross_sf.is_none());
        assert!(assumptions.sale_date.is_none());
        assert!(!assumptions.refinance_enabled);
    }

    #[test]
    fn test_tenant_and_tranche_defaults() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": 36,
            "tenants": [{ "sf": 1000, "currentRent": 30 }],
            "mlas": [{}]
        }))
        .unwrap();

        let tenant = &assumptions.tenants[0];
        assert_eq!(tenant.name, "Tenant-1");
        assert_eq!(tenant.exp_month, 37);
        assert!(tenant.tranche.is_none());

        let tranche = &assumptions.tranches[0];
        assert_eq!(tranche.name, "MLA-1");
        assert_eq!(tranche.lease_term_months, DEFAULT_LEASE_TERM_MONTHS);
        assert_eq!(tranche.market_rent, None);
        assert_eq!(tranche.growth, GrowthCurve::default());
    }

    #[test]
    fn test_hold_period_must_be_positive() {
        let missing = Assumptions::from_value(json!({}));
        assert!(matches!(missing, Err(UnderwritingError::InvalidHoldPeriod(0))));

        let negative = Assumptions::from_value(json!({ "holdMonths": -12 }));
        assert!(matches!(negative, Err(UnderwritingError::InvalidHoldPeriod(-12))));
    }

    #[test]
    fn test_malformed_numeric_string_is_fatal() {
        let result = Assumptions::from_value(json!({ "holdMonths": 12, "opexRatio": "thirty" }));
        assert!(matches!(result, Err(UnderwritingError::Json(_))));

        let result = Assumptions::from_value(json!({ "holdMonths": "twelve" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": "12",
            "purchasePrice": "10000000",
            "capexSchedule": { "3": "25000", "7": 10000 }
        }))
        .unwrap();

        assert_eq!(assumptions.hold_months, 12);
        assert_eq!(assumptions.purchase_price, 10_000_000.0);
        assert_eq!(assumptions.capex_schedule.amount(3), 25_000.0);
        assert_eq!(assumptions.capex_schedule.amount(7), 10_000.0);
    }

    #[test]
    fn test_bad_capex_key_is_fatal() {
        let result = Assumptions::from_value(json!({
            "holdMonths": 12,
            "capexSchedule": { "month three": 25000 }
        }));
        assert!(matches!(result, Err(UnderwritingError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_exit_cap_is_fatal() {
        let result = Assumptions::from_value(json!({ "holdMonths": 12, "exitCapRate": 0 }));
        assert!(matches!(result, Err(UnderwritingError::InvalidInput { .. })));

        let result = Assumptions::from_value(json!({ "holdMonths": 12, "exitCapRate": "0.0" }));
        assert!(matches!(result, Err(UnderwritingError::InvalidInput { .. })));
    }

    #[test]
    fn test_negative_exit_cap_is_accepted() {
        let assumptions =
            Assumptions::from_value(json!({ "holdMonths": 12, "exitCapRate": -0.05 })).unwrap();
        assert_eq!(assumptions.exit_cap_rate, -0.05);
    }

    #[test]
    fn test_sale_date_derived_from_acquisition() {
        let assumptions = Assumptions::from_value(json!({
            "holdMonths": 18,
            "acquisitionDate": "2026-03-15"
        }))
        .unwrap();
        assert_eq!(assumptions.sale_date, NaiveDate::from_ymd_opt(2027, 9, 15));

        let explicit = Assumptions::from_value(json!({
            "holdMonths": 18,
            "acquisitionDate": "2026-03-15",
            "saleDate": "2027-12-31"
        }))
        .unwrap();
        assert_eq!(explicit.sale_date, NaiveDate::from_ymd_opt(2027, 12, 31));
    }

    #[test]
    fn test_malformed_date_is_fatal() {
        let result = Assumptions::from_value(json!({
            "holdMonths": 12,
            "acquisitionDate": "03/15/2026"
        }));
        assert!(matches!(result, Err(UnderwritingError::InvalidInput { .. })));
    }

    #[test]
    fn test_refinance_presence() {
        let empty = Assumptions::from_value(json!({ "holdMonths": 12, "refinance": {} })).unwrap();
        assert!(!empty.refinance_enabled);

        let null = Assumptions::from_value(json!({ "holdMonths": 12, "refinance": null })).unwrap();
        assert!(!null.refinance_enabled);

        let present = Assumptions::from_value(json!({
            "holdMonths": 12,
            "refinance": { "initialLtv": 0.65 }
        }))
        .unwrap();
        assert!(present.refinance_enabled);
    }
}
