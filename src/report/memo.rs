//! Institutional underwriting memo rendered from resolved assumptions

use std::fmt::Display;

use crate::assumptions::Assumptions;

const NOT_AVAILABLE: &str = "N/A";

/// Render the seven-section underwriting memo as Markdown
pub fn generate_summary(assumptions: &Assumptions) -> String {
    let debt = &assumptions.debt;

    let lines = [
        "# Institutional Underwriting Memo".to_string(),
        String::new(),
        "## 1) Executive Snapshot".to_string(),
        format!("- Acquisition date: {}", or_na(assumptions.acquisition_date)),
        format!("- Hold period: {} months", assumptions.hold_months),
        format!(
            "- Gross SF: {}",
            assumptions.gross_sf.map_or_else(|| NOT_AVAILABLE.to_string(), format_area)
        ),
        format!("- Purchase price: ${}", thousands(assumptions.purchase_price, 0)),
        format!("- Closing costs: ${}", thousands(assumptions.closing_costs, 0)),
        String::new(),
        "## 2) Returns Framework".to_string(),
        "- Model is monthly and annualized in reporting rollups.".to_string(),
        "- Returns should be read from monthly cash-flow outputs: levered/unlevered IRR, \
         equity multiples, and levered dollar profit."
            .to_string(),
        String::new(),
        "## 3) Rent Roll / MLA Structure".to_string(),
        format!("- Tenant count: {}", assumptions.tenants.len()),
        format!("- MLA tranche count: {}", assumptions.tranches.len()),
        "- MLA template fields include market rent, TI/LC, renewal probability, lease term, \
         free rent, and growth years 1-10."
            .to_string(),
        String::new(),
        "## 4) Capital Plan".to_string(),
        format!("- Monthly reserves: ${}", thousands(assumptions.reserves_monthly, 0)),
        format!("- Capex schedule entries: {}", assumptions.capex_schedule.len()),
        String::new(),
        "## 5) Debt & Refinance".to_string(),
        format!("- Initial LTV: {}", percent(debt.initial_ltv)),
        format!("- Rate index: {}", or_na(debt.rate_index.as_deref())),
        format!("- Fixed/Floating: {}", or_na(debt.fixed_floating.as_deref())),
        format!(
            "- Refinance enabled: {}",
            if assumptions.refinance_enabled { "Yes" } else { "No" }
        ),
        String::new(),
        "## 6) Exit Assumptions".to_string(),
        format!("- Exit cap rate: {}", percent(assumptions.exit_cap_rate)),
        format!("- Sale date: {}", or_na(assumptions.sale_date)),
        String::new(),
        "## 7) Notes".to_string(),
        "- SOFR curve integration can be layered in by replacing static index-rate input \
         with API values."
            .to_string(),
        "- Export assumptions and workbook for analyst-side audit and updates in Excel.".to_string(),
    ];

    lines.join("\n")
}

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

fn format_area(sf: f64) -> String {
    if sf.fract() == 0.0 {
        thousands(sf, 0)
    } else {
        thousands(sf, 2)
    }
}

/// Fixed-point formatting with comma thousands separators
fn thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = include_str!("../../data/sample_assumptions.json");

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0, 0), "0");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1_000.0, 0), "1,000");
        assert_eq!(thousands(14_500_000.0, 0), "14,500,000");
        assert_eq!(thousands(1_234.567, 2), "1,234.57");
        assert_eq!(thousands(-25_000.0, 0), "-25,000");
        assert_eq!(thousands(-0.001, 0), "0");
    }

    #[test]
    fn test_sample_memo() {
        let assumptions = Assumptions::from_json_str(SAMPLE).unwrap();
        let memo = generate_summary(&assumptions);

        assert!(memo.starts_with("# Institutional Underwriting Memo\n"));
        assert!(memo.contains("- Acquisition date: 2026-01-01"));
        assert!(memo.contains("- Hold period: 60 months"));
        assert!(memo.contains("- Gross SF: 48,000"));
        assert!(memo.contains("- Purchase price: $14,500,000"));
        assert!(memo.contains("- Closing costs: $290,000"));
        assert!(memo.contains("- Tenant count: 4"));
        assert!(memo.contains("- MLA tranche count: 2"));
        assert!(memo.contains("- Capex schedule entries: 3"));
        assert!(memo.contains("- Initial LTV: 60.00%"));
        assert!(memo.contains("- Rate index: SOFR"));
        assert!(memo.contains("- Fixed/Floating: Floating"));
        assert!(memo.contains("- Refinance enabled: Yes"));
        assert!(memo.contains("- Exit cap rate: 6.75%"));
        assert!(memo.contains("- Sale date: 2031-01-01"));
    }

    #[test]
    fn test_sections_in_order() {
        let assumptions = Assumptions::from_json_str(SAMPLE).unwrap();
        let memo = generate_summary(&assumptions);

        let positions: Vec<usize> = (1..=7)
            .map(|n| memo.find(&format!("## {})", n)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_values_render_na() {
        let assumptions = Assumptions::from_value(json!({ "holdMonths": 24 })).unwrap();
        let memo = generate_summary(&assumptions);

        assert!(memo.contains("- Acquisition date: N/A"));
        assert!(memo.contains("- Gross SF: N/A"));
        assert!(memo.contains("- Rate index: N/A"));
        assert!(memo.contains("- Fixed/Floating: N/A"));
        assert!(memo.contains("- Refinance enabled: No"));
        assert!(memo.contains("- Sale date: N/A"));
        assert!(memo.contains("- Exit cap rate: 6.50%"));
        assert!(memo.contains("- Tenant count: 0"));
    }
}
