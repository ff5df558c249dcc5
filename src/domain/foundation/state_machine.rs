//! Lifecycle trait shared by the booking, payment and gift card statuses.

use std::fmt::Debug;

use super::{DomainError, ErrorCode};

/// A status enum with an explicit transition table.
///
/// Implementors supply the table; `transition_to` turns a disallowed move
/// into an `InvalidStateTransition` error carrying `from`/`to` details.
pub trait StateMachine: Sized + Copy + PartialEq + Debug {
    /// Lowercase noun used in rejection messages, e.g. `"booking"`.
    const SUBJECT: &'static str;

    fn can_transition_to(&self, target: &Self) -> bool;

    fn valid_transitions(&self) -> Vec<Self>;

    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            return Ok(target);
        }
        Err(DomainError::new(
            ErrorCode::InvalidStateTransition,
            format!("Cannot transition {} from {:?} to {:?}", Self::SUBJECT, self, target),
        )
        .with_detail("from", format!("{:?}", self))
        .with_detail("to", format!("{:?}", target)))
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
