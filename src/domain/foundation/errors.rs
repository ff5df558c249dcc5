//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Broad grouping of error codes, used by callers to pick an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    State,
    BusinessRule,
    NotFound,
    Infrastructure,
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Not found errors
    BookingNotFound,
    PaymentNotFound,
    CouponNotFound,
    GiftCardNotFound,
    LoyaltyStatusNotFound,
    UserNotFound,

    // State errors
    InvalidStateTransition,
    BookingNotOnDate,
    BookingDatePassed,

    // Business rule errors
    DiscountExceedsSubtotal,
    RefundExceedsAmount,
    InsufficientPoints,
    CouponNotValid,
    CouponNotApplicable,
    CouponAlreadyUsed,
    DuplicateCouponCode,
    GiftCardExpired,
    GiftCardDepleted,
    RetryLimitReached,

    // Infrastructure errors
    DatabaseError,
    NotificationError,
    InternalError,
}

impl ErrorCode {
    /// Returns the category this code belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ErrorCategory::Validation,

            ErrorCode::BookingNotFound
            | ErrorCode::PaymentNotFound
            | ErrorCode::CouponNotFound
            | ErrorCode::GiftCardNotFound
            | ErrorCode::LoyaltyStatusNotFound
            | ErrorCode::UserNotFound => ErrorCategory::NotFound,

            ErrorCode::InvalidStateTransition
            | ErrorCode::BookingNotOnDate
            | ErrorCode::BookingDatePassed => ErrorCategory::State,

            ErrorCode::DiscountExceedsSubtotal
            | ErrorCode::RefundExceedsAmount
            | ErrorCode::InsufficientPoints
            | ErrorCode::CouponNotValid
            | ErrorCode::CouponNotApplicable
            | ErrorCode::CouponAlreadyUsed
            | ErrorCode::DuplicateCouponCode
            | ErrorCode::GiftCardExpired
            | ErrorCode::GiftCardDepleted
            | ErrorCode::RetryLimitReached => ErrorCategory::BusinessRule,

            ErrorCode::DatabaseError | ErrorCode::NotificationError | ErrorCode::InternalError => {
                ErrorCategory::Infrastructure
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::BookingNotFound => "BOOKING_NOT_FOUND",
            ErrorCode::PaymentNotFound => "PAYMENT_NOT_FOUND",
            ErrorCode::CouponNotFound => "COUPON_NOT_FOUND",
            ErrorCode::GiftCardNotFound => "GIFT_CARD_NOT_FOUND",
            ErrorCode::LoyaltyStatusNotFound => "LOYALTY_STATUS_NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::BookingNotOnDate => "BOOKING_NOT_ON_DATE",
            ErrorCode::BookingDatePassed => "BOOKING_DATE_PASSED",
            ErrorCode::DiscountExceedsSubtotal => "DISCOUNT_EXCEEDS_SUBTOTAL",
            ErrorCode::RefundExceedsAmount => "REFUND_EXCEEDS_AMOUNT",
            ErrorCode::InsufficientPoints => "INSUFFICIENT_POINTS",
            ErrorCode::CouponNotValid => "COUPON_NOT_VALID",
            ErrorCode::CouponNotApplicable => "COUPON_NOT_APPLICABLE",
            ErrorCode::CouponAlreadyUsed => "COUPON_ALREADY_USED",
            ErrorCode::DuplicateCouponCode => "DUPLICATE_COUPON_CODE",
            ErrorCode::GiftCardExpired => "GIFT_CARD_EXPIRED",
            ErrorCode::GiftCardDepleted => "GIFT_CARD_DEPLETED",
            ErrorCode::RetryLimitReached => "RETRY_LIMIT_REACHED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotificationError => "NOTIFICATION_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: message.into(),
            details: HashMap::new(),
        }
        .with_detail("field", field.into())
    }

    /// Creates an invalid state transition error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidStateTransition, message)
    }

    /// Creates a database error from any displayable source.
    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, format!("Database error: {}", err))
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let (code, field) = match &err {
            ValidationError::EmptyField { field } => (ErrorCode::EmptyField, field.clone()),
            ValidationError::OutOfRange { field, .. } => (ErrorCode::OutOfRange, field.clone()),
            ValidationError::InvalidFormat { field, .. } => (ErrorCode::InvalidFormat, field.clone()),
        };
        DomainError::new(code, err.to_string()).with_detail("field", field)
    }
}
