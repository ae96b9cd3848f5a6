use rust_decimal::Decimal;
use tracing::debug;
use vamm_domain::{AssetPair, Price, Result, VammError};

/// Checks `|post − open| ≤ ratio × open`. A move of exactly `ratio` passes.
///
/// # Errors
/// Returns `OverFluctuationLimit` when the post-trade price moves further
/// than allowed from the block's opening price.
pub fn check_fluctuation_limit(
    pair: &AssetPair,
    post_price: Price,
    open_price: Price,
    limit_ratio: Decimal,
) -> Result<()> {
    let within = post_price.within_ratio_of(open_price, limit_ratio);
    debug!(
        pair = %pair,
        price = %post_price,
        open_price = %open_price,
        limit_ratio = %limit_ratio,
        within,
        "Checking fluctuation limit"
    );
    if within {
        return Ok(());
    }
    let movement = post_price
        .deviation_from(open_price)
        .ok_or_else(|| VammError::invariant("fluctuation movement overflows"))?;
    Err(VammError::OverFluctuationLimit {
        pair: pair.clone(),
        price: post_price.value,
        open_price: open_price.value,
        movement,
        limit_ratio,
    })
}
