pub mod amount;
pub mod pair;
pub mod price;
pub mod ratio_bound;

pub use amount::{Amount, ReserveProduct};
pub use pair::AssetPair;
pub use price::Price;
pub use ratio_bound::RatioBound;
