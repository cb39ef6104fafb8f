//! Syntax validation for addresses, transaction IDs, and block hashes
//!
//! These checks run client-side before a request is built, so malformed
//! input fails fast instead of round-tripping to the API.

use regex::Regex;
use std::sync::OnceLock;

#[allow(clippy::expect_used)]
fn address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^kaspa:[a-z0-9]{61,63}$").expect("static pattern compiles"))
}

#[allow(clippy::expect_used)]
fn hash_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-f0-9]{64}$").expect("static pattern compiles"))
}

/// Returns true if the string is a syntactically valid Kaspa address
pub fn is_valid_address(address: &str) -> bool {
    address_re().is_match(address)
}

/// Returns true if the string is a syntactically valid transaction ID
/// (64 lowercase hex characters)
pub fn is_valid_transaction_id(transaction_id: &str) -> bool {
    hash_re().is_match(transaction_id)
}

/// Returns true if the string is a syntactically valid block hash
/// (64 lowercase hex characters)
pub fn is_valid_block_hash(block_hash: &str) -> bool {
    hash_re().is_match(block_hash)
}
