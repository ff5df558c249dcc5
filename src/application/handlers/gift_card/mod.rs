//! Gift card handlers.

mod issue_gift_card;
mod redeem_gift_card;

pub use issue_gift_card::{IssueGiftCardCommand, IssueGiftCardHandler};
pub use redeem_gift_card::{RedeemGiftCardCommand, RedeemGiftCardHandler, RedeemGiftCardResult};
