//! Gift card domain module.

mod aggregate;
mod code;
mod status;
mod transaction;

pub use aggregate::{GiftCard, GiftCardDetails, DEFAULT_VALIDITY_DAYS, MAX_VALIDITY_DAYS};
pub use code::GiftCardCode;
pub use status::GiftCardStatus;
pub use transaction::GiftCardTransaction;
