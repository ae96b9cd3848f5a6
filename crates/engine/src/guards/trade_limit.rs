use tracing::debug;
use vamm_domain::{Amount, AssetSide, Direction, Pool, Result, VammError};

/// Largest amount of `side` a single trade may move:
/// `trade_limit_ratio × reserve`, rounded down.
///
/// # Errors
/// Returns `InvariantViolation` on overflow.
pub fn trade_limit(pool: &Pool, side: AssetSide) -> Result<Amount> {
    pool.reserve(side)
        .mul_ratio_floor(pool.params().trade_limit_ratio)
        .ok_or_else(|| VammError::invariant(format!("trade limit of {} overflows", pool.pair())))
}

/// Checks that moving `amount` of `side` in `direction` stays within the
/// pool's trade limit. An amount exactly at the limit is allowed.
///
/// The comparison `amount <= ratio × reserve` is exact. A removal that would
/// leave the reserve at or below zero is rejected as well, even when the
/// ratio is 1.
///
/// # Errors
/// Returns `OverTradeLimit` when the limit is exceeded.
pub fn check_trade_limit(
    pool: &Pool,
    side: AssetSide,
    amount: Amount,
    direction: Direction,
) -> Result<()> {
    let reserve = pool.reserve(side);
    let ratio = pool.params().trade_limit_ratio;
    let within = amount.at_most_ratio_of(reserve, ratio);
    let exhausts = direction == Direction::RemoveFromPool && amount >= reserve;
    debug!(
        pair = %pool.pair(),
        side = %side,
        amount = %amount,
        reserve = %reserve,
        ratio = %ratio,
        "Checking trade limit"
    );
    if within && !exhausts {
        return Ok(());
    }
    Err(VammError::OverTradeLimit {
        pair: pool.pair().clone(),
        side,
        amount,
        limit: trade_limit(pool, side)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use vamm_domain::PoolParams;

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn pool_with(quote: Amount, base: Amount, trade_limit_ratio: Decimal) -> Pool {
        Pool::new(
            "ubtc:unusd".parse().unwrap(),
            quote,
            base,
            PoolParams {
                trade_limit_ratio,
                fluctuation_limit_ratio: dec!(0.05),
                max_oracle_spread_ratio: dec!(0.1),
                maintenance_margin_ratio: dec!(0.0625),
                max_leverage: dec!(15),
            },
        )
        .unwrap()
    }

    fn pool(trade_limit_ratio: Decimal) -> Pool {
        pool_with(Amount::from_units(1_000_000), Amount::from_units(1000), trade_limit_ratio)
    }

    #[test]
    fn test_limit_is_inclusive() {
        let p = pool(dec!(0.1));
        assert!(check_trade_limit(&p, AssetSide::Quote, amount("100000"), Direction::AddToPool).is_ok());
        let over = amount("100000.000000000000000001");
        let err = check_trade_limit(&p, AssetSide::Quote, over, Direction::AddToPool).unwrap_err();
        assert_eq!(
            err,
            VammError::OverTradeLimit {
                pair: p.pair().clone(),
                side: AssetSide::Quote,
                amount: over,
                limit: amount("100000"),
            }
        );
    }

    #[test]
    fn test_comparison_is_exact_below_raw_unit() {
        // 0.3 x 0.000000000000000001 is below one raw unit
        let p = pool_with(amount("1000.000000000000000001"), Amount::from_units(1000), dec!(0.3));
        assert!(check_trade_limit(&p, AssetSide::Quote, amount("300"), Direction::AddToPool).is_ok());
        let err = check_trade_limit(&p, AssetSide::Quote, amount("300.000000000000000001"), Direction::AddToPool)
            .unwrap_err();
        let VammError::OverTradeLimit { limit, .. } = err else {
            panic!("expected OverTradeLimit, got {err:?}");
        };
        assert_eq!(limit, amount("300"));
    }

    #[test]
    fn test_uses_side_reserve() {
        let p = pool(dec!(0.1));
        assert!(check_trade_limit(&p, AssetSide::Base, amount("100"), Direction::RemoveFromPool).is_ok());
        assert!(check_trade_limit(&p, AssetSide::Base, amount("101"), Direction::RemoveFromPool).is_err());
    }

    #[test]
    fn test_full_removal_rejected() {
        let p = pool(dec!(1));
        assert!(check_trade_limit(&p, AssetSide::Base, amount("1000"), Direction::AddToPool).is_ok());
        assert!(matches!(
            check_trade_limit(&p, AssetSide::Base, amount("1000"), Direction::RemoveFromPool),
            Err(VammError::OverTradeLimit { .. })
        ));
        assert!(check_trade_limit(&p, AssetSide::Base, amount("999.9"), Direction::RemoveFromPool).is_ok());
    }
}
