//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `BookingRepository`, `PaymentRepository`
//! - `CouponRepository`, `CouponUsageRepository`
//! - `GiftCardRepository`, `LoyaltyRepository`
//!
//! ## Collaborator Ports
//!
//! - `UnitOfWorkFactory` / `UnitOfWork` - transactional scope for webhook reconciliation,
//!   including the system actor lookup by email
//! - `PaymentNotifier` - best-effort payment notifications

mod booking_repository;
mod coupon_repository;
mod gift_card_repository;
mod loyalty_repository;
mod payment_notifier;
mod payment_repository;
mod unit_of_work;

pub use booking_repository::BookingRepository;
pub use coupon_repository::{CouponRepository, CouponUsageRepository};
pub use gift_card_repository::GiftCardRepository;
pub use loyalty_repository::LoyaltyRepository;
pub use payment_notifier::PaymentNotifier;
pub use payment_repository::PaymentRepository;
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory};
