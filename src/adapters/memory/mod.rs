//! In-memory adapters for tests and local runs.

mod notifier;
mod store;
mod unit_of_work;

pub use notifier::{RecordingNotifier, SentNotification};
pub use store::InMemoryStore;
pub use unit_of_work::InMemoryUnitOfWork;
