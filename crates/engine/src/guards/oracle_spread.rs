use crate::oracle::{OraclePrice, PriceOracle};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};
use vamm_domain::{AssetPair, Price, Result, VammError};

/// Looks up the oracle price for `pair`, treating a missing or stale price
/// as unavailable.
///
/// # Errors
/// Returns `OraclePriceUnavailable` when no fresh price exists.
pub fn fresh_reference_price<O: PriceOracle + ?Sized>(
    oracle: &O,
    pair: &AssetPair,
    now: DateTime<Utc>,
    max_age_secs: u64,
) -> Result<OraclePrice> {
    let unavailable = || VammError::OraclePriceUnavailable { pair: pair.clone() };
    let reference = oracle.reference_price(pair).ok_or_else(unavailable)?;
    if reference.price.value <= Decimal::ZERO || !reference.is_fresh(now, max_age_secs) {
        warn!(
            pair = %pair,
            price = %reference.price,
            published_at = %reference.published_at,
            "Oracle price is stale or not positive"
        );
        return Err(unavailable());
    }
    Ok(reference)
}

/// Checks `|post − reference| ≤ ratio × reference` against a fresh oracle
/// price. A missing or stale oracle price fails the check.
///
/// # Errors
/// Returns `OraclePriceUnavailable` or `OverSpreadLimit`.
pub fn check_oracle_spread<O: PriceOracle + ?Sized>(
    pair: &AssetPair,
    post_price: Price,
    oracle: &O,
    limit_ratio: Decimal,
    now: DateTime<Utc>,
    max_age_secs: u64,
) -> Result<()> {
    let reference = fresh_reference_price(oracle, pair, now, max_age_secs)?.price;
    let within = post_price.within_ratio_of(reference, limit_ratio);
    debug!(
        pair = %pair,
        price = %post_price,
        oracle_price = %reference,
        limit_ratio = %limit_ratio,
        within,
        "Checking oracle spread"
    );
    if within {
        return Ok(());
    }
    let spread = post_price
        .deviation_from(reference)
        .ok_or_else(|| VammError::invariant("oracle spread overflows"))?;
    Err(VammError::OverSpreadLimit {
        pair: pair.clone(),
        price: post_price.value,
        oracle_price: reference.value,
        spread,
        limit_ratio,
    })
}
