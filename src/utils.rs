//! Utility functions and chain constants

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

/// Sompi per whole KAS coin
pub const SOMPI_PER_KASPA: u64 = 100_000_000;

/// Subnetwork ID that marks coinbase (mining) transactions
pub const MINING_SUBNETWORK_ID: &str = "0100000000000000000000000000000000000000";

/// Converts a date-time to the epoch-millis form used by the API as
/// pagination boundary seeds and block times
pub fn to_epoch_millis(datetime: DateTime<Utc>) -> i64 {
    datetime.timestamp_millis()
}

/// Converts an epoch-millis value back to a date-time
///
/// Returns `None` for values outside the representable range.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Converts an amount in sompi to whole KAS
pub fn sompi_to_kaspa(sompi: u64) -> Decimal {
    Decimal::from(sompi) / Decimal::from(SOMPI_PER_KASPA)
}
