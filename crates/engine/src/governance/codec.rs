//! Protobuf wire codec for proposals and persisted pool records.
//!
//! Messages are `prost` structs whose fields are ordered by tag, so equal
//! values always produce identical bytes on every replica.
//!
//! Quantities travel the way the surrounding chain encodes its fixed-point
//! type: a length-delimited string holding the integer `value × 10^18`
//! (`0.1` is `"100000000000000000"`). Reserves decode into [`Amount`] without
//! loss at any width. Ratios decode into `Decimal` and must be exactly
//! representable there.
//!
//! ```text
//! CreatePoolProposal              Pool record
//!  1 title                  str    1 pair                      str
//!  2 description            str    2 quote_asset_reserve       dec
//!  3 pair                   str    3 base_asset_reserve        dec
//!  4 trade_limit_ratio      dec    4 trade_limit_ratio         dec
//!  5 quote_asset_reserve    dec    5 fluctuation_limit_ratio   dec
//!  6 base_asset_reserve     dec    6 max_oracle_spread_ratio   dec
//!  7 fluctuation_limit_ratio dec   7 maintenance_margin_ratio  dec
//!  8 max_oracle_spread_ratio dec   8 max_leverage              dec
//!  9 maintenance_margin_ratio dec
//! 10 max_leverage           dec
//! ```
//!
//! Empty strings are omitted and decimals are always written. On decode a
//! missing field takes its zero value and unknown fields are skipped.

use super::proposal::CreatePoolProposal;
use primitive_types::{U256, U512};
use prost::Message;
use rust_decimal::Decimal;
use thiserror::Error;
use vamm_domain::math::fixed::decimal_from_scaled;
use vamm_domain::{Amount, AssetPair, PRECISION_SCALE, Pool, PoolParams, Rounding, VammError};

/// Hard cap on an encoded message, checked before decoding.
pub const MAX_MESSAGE_LEN: usize = 64 * 1024;

/// Codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("message of {len} bytes exceeds limit {limit}")]
    TooLarge { len: usize, limit: usize },

    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("field {field} holds invalid decimal {value:?}")]
    InvalidDecimal { field: u32, value: String },

    #[error("field {field}: {value} is not exactly representable")]
    PrecisionExceeded { field: u32, value: String },

    #[error("decoded record is not a valid pool: {0}")]
    InvalidRecord(VammError),
}

impl From<prost::DecodeError> for CodecError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Malformed(err.to_string())
    }
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;

mod wire {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreatePoolProposal {
        #[prost(string, tag = "1")]
        pub title: String,
        #[prost(string, tag = "2")]
        pub description: String,
        #[prost(string, tag = "3")]
        pub pair: String,
        #[prost(string, tag = "4")]
        pub trade_limit_ratio: String,
        #[prost(string, tag = "5")]
        pub quote_asset_reserve: String,
        #[prost(string, tag = "6")]
        pub base_asset_reserve: String,
        #[prost(string, tag = "7")]
        pub fluctuation_limit_ratio: String,
        #[prost(string, tag = "8")]
        pub max_oracle_spread_ratio: String,
        #[prost(string, tag = "9")]
        pub maintenance_margin_ratio: String,
        #[prost(string, tag = "10")]
        pub max_leverage: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Pool {
        #[prost(string, tag = "1")]
        pub pair: String,
        #[prost(string, tag = "2")]
        pub quote_asset_reserve: String,
        #[prost(string, tag = "3")]
        pub base_asset_reserve: String,
        #[prost(string, tag = "4")]
        pub trade_limit_ratio: String,
        #[prost(string, tag = "5")]
        pub fluctuation_limit_ratio: String,
        #[prost(string, tag = "6")]
        pub max_oracle_spread_ratio: String,
        #[prost(string, tag = "7")]
        pub maintenance_margin_ratio: String,
        #[prost(string, tag = "8")]
        pub max_leverage: String,
    }
}

/// Encodes a create-pool proposal.
///
/// # Errors
/// Returns `PrecisionExceeded` for a ratio finer than 18 places and
/// `TooLarge` when the message exceeds [`MAX_MESSAGE_LEN`].
pub fn encode_create_pool(proposal: &CreatePoolProposal) -> CodecResult<Vec<u8>> {
    let message = wire::CreatePoolProposal {
        title: proposal.title.clone(),
        description: proposal.description.clone(),
        pair: proposal.pair.clone(),
        trade_limit_ratio: decimal_to_wire(4, proposal.trade_limit_ratio)?,
        quote_asset_reserve: amount_to_wire(proposal.quote_asset_reserve),
        base_asset_reserve: amount_to_wire(proposal.base_asset_reserve),
        fluctuation_limit_ratio: decimal_to_wire(7, proposal.fluctuation_limit_ratio)?,
        max_oracle_spread_ratio: decimal_to_wire(8, proposal.max_oracle_spread_ratio)?,
        maintenance_margin_ratio: decimal_to_wire(9, proposal.maintenance_margin_ratio)?,
        max_leverage: decimal_to_wire(10, proposal.max_leverage)?,
    };
    encode_capped(&message)
}

/// Decodes a create-pool proposal. Semantic checks are left to the
/// validator.
///
/// # Errors
/// Returns a `CodecError` for malformed input.
pub fn decode_create_pool(bytes: &[u8]) -> CodecResult<CreatePoolProposal> {
    check_len(bytes.len())?;
    let message = wire::CreatePoolProposal::decode(bytes)?;
    Ok(CreatePoolProposal {
        trade_limit_ratio: decimal_from_wire(4, &message.trade_limit_ratio)?,
        quote_asset_reserve: amount_from_wire(5, &message.quote_asset_reserve)?,
        base_asset_reserve: amount_from_wire(6, &message.base_asset_reserve)?,
        fluctuation_limit_ratio: decimal_from_wire(7, &message.fluctuation_limit_ratio)?,
        max_oracle_spread_ratio: decimal_from_wire(8, &message.max_oracle_spread_ratio)?,
        maintenance_margin_ratio: decimal_from_wire(9, &message.maintenance_margin_ratio)?,
        max_leverage: decimal_from_wire(10, &message.max_leverage)?,
        title: message.title,
        description: message.description,
        pair: message.pair,
    })
}

/// Encodes a pool as its persisted record.
///
/// # Errors
/// Returns `PrecisionExceeded` for a ratio finer than 18 places.
pub fn encode_pool(pool: &Pool) -> CodecResult<Vec<u8>> {
    let params = pool.params();
    let message = wire::Pool {
        pair: pool.pair().to_string(),
        quote_asset_reserve: amount_to_wire(pool.quote_asset_reserve()),
        base_asset_reserve: amount_to_wire(pool.base_asset_reserve()),
        trade_limit_ratio: decimal_to_wire(4, params.trade_limit_ratio)?,
        fluctuation_limit_ratio: decimal_to_wire(5, params.fluctuation_limit_ratio)?,
        max_oracle_spread_ratio: decimal_to_wire(6, params.max_oracle_spread_ratio)?,
        maintenance_margin_ratio: decimal_to_wire(7, params.maintenance_margin_ratio)?,
        max_leverage: decimal_to_wire(8, params.max_leverage)?,
    };
    encode_capped(&message)
}

/// Decodes a persisted pool record and re-checks the pool invariants.
///
/// # Errors
/// Returns a `CodecError` for malformed input, or `InvalidRecord` when the
/// decoded values do not form a valid pool.
pub fn decode_pool(bytes: &[u8]) -> CodecResult<Pool> {
    check_len(bytes.len())?;
    let message = wire::Pool::decode(bytes)?;
    let params = PoolParams {
        trade_limit_ratio: decimal_from_wire(4, &message.trade_limit_ratio)?,
        fluctuation_limit_ratio: decimal_from_wire(5, &message.fluctuation_limit_ratio)?,
        max_oracle_spread_ratio: decimal_from_wire(6, &message.max_oracle_spread_ratio)?,
        maintenance_margin_ratio: decimal_from_wire(7, &message.maintenance_margin_ratio)?,
        max_leverage: decimal_from_wire(8, &message.max_leverage)?,
    };
    let quote = amount_from_wire(2, &message.quote_asset_reserve)?;
    let base = amount_from_wire(3, &message.base_asset_reserve)?;
    let pair: AssetPair = message.pair.parse().map_err(CodecError::InvalidRecord)?;
    Pool::new(pair, quote, base, params).map_err(CodecError::InvalidRecord)
}

/// Text form of `value × 10^18`.
///
/// # Errors
/// Returns `PrecisionExceeded` when `value` has more than 18 fractional digits.
pub fn decimal_to_wire(field: u32, value: Decimal) -> CodecResult<String> {
    let normalized = value.normalize();
    let scale = normalized.scale();
    if scale > PRECISION_SCALE {
        return Err(CodecError::PrecisionExceeded {
            field,
            value: value.to_string(),
        });
    }
    let mantissa = normalized.mantissa();
    if mantissa == 0 {
        return Ok("0".to_string());
    }
    let padding = (PRECISION_SCALE - scale) as usize;
    Ok(format!("{mantissa}{}", "0".repeat(padding)))
}

/// Parses the text form of `value × 10^18` back into a decimal. An empty
/// string is zero.
///
/// # Errors
/// Returns `InvalidDecimal` for anything other than an optionally negative
/// run of ASCII digits or a value outside the decimal range, and
/// `PrecisionExceeded` when the value carries more significant digits than
/// a decimal holds.
pub fn decimal_from_wire(field: u32, text: &str) -> CodecResult<Decimal> {
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let invalid = || CodecError::InvalidDecimal {
        field,
        value: text.to_string(),
    };
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if !is_digits(digits) {
        return Err(invalid());
    }
    let raw = U512::from_dec_str(digits).map_err(|_| invalid())?;
    let down = decimal_from_scaled(raw, negative, PRECISION_SCALE, Rounding::Down).ok_or_else(invalid)?;
    let up = decimal_from_scaled(raw, negative, PRECISION_SCALE, Rounding::Up).ok_or_else(invalid)?;
    if down != up {
        return Err(CodecError::PrecisionExceeded {
            field,
            value: text.to_string(),
        });
    }
    Ok(down)
}

/// Text form of an amount's raw integer.
pub fn amount_to_wire(amount: Amount) -> String {
    amount.raw().to_string()
}

/// Parses the text form of `value × 10^18` into an amount, exactly. An
/// empty string is zero.
///
/// # Errors
/// Returns `InvalidDecimal` for anything other than a run of ASCII digits
/// that fits 256 bits.
pub fn amount_from_wire(field: u32, text: &str) -> CodecResult<Amount> {
    if text.is_empty() {
        return Ok(Amount::zero());
    }
    if !is_digits(text) {
        return Err(CodecError::InvalidDecimal {
            field,
            value: text.to_string(),
        });
    }
    U256::from_dec_str(text)
        .map(Amount::from_raw)
        .map_err(|_| CodecError::InvalidDecimal {
            field,
            value: text.to_string(),
        })
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn check_len(len: usize) -> CodecResult<()> {
    if len > MAX_MESSAGE_LEN {
        return Err(CodecError::TooLarge {
            len,
            limit: MAX_MESSAGE_LEN,
        });
    }
    Ok(())
}

fn encode_capped<M: Message>(message: &M) -> CodecResult<Vec<u8>> {
    check_len(message.encoded_len())?;
    Ok(message.encode_to_vec())
}
