//! Governance surface: proposal payloads, their validation and wire codec.

pub mod codec;
mod proposal;
mod validator;

pub use codec::{CodecError, decode_create_pool, decode_pool, encode_create_pool, encode_pool};
pub use proposal::{CreatePoolProposal, EditPoolParamsProposal};
pub use validator::{validate_create_pool, validate_edit_pool};
