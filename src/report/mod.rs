//! Report surfaces: underwriting memo text and result snapshot writers

pub mod export;
pub mod memo;

pub use export::{write_annual_csv, write_json, write_memo, write_monthly_csv, write_result};
pub use memo::generate_summary;
