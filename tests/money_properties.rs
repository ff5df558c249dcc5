//! Property-based tests for the money rules.
//!
//! Covers booking totals, coupon discount bounds, accumulating payment
//! refunds and gift card balances over a wide range of amounts.

use chrono::{Duration, NaiveTime, Utc};
use proptest::prelude::*;

use funbookr::domain::booking::{Booking, NewBooking};
use funbookr::domain::coupon::{Coupon, CouponCode, DiscountRule, NewCoupon};
use funbookr::domain::foundation::{ActivityId, BookingId, Currency, Money, Percentage, Timestamp, UserId};
use funbookr::domain::gift_card::{GiftCard, GiftCardDetails};
use funbookr::domain::payment::{CapturedPayment, Payment};

// Strategies for generating test data
fn minor_amount_strategy() -> impl Strategy<Value = i64> {
    1i64..10_000_000
}

fn participants_strategy() -> impl Strategy<Value = u32> {
    1u32..20
}

fn booking(participants: u32, price_minor: i64) -> Booking {
    Booking::create(NewBooking {
        customer_id: UserId::new(),
        activity_id: ActivityId::new(),
        booking_date: (Utc::now() + Duration::days(7)).date_naive(),
        booking_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        participant_count: participants,
        price_per_participant: Money::from_minor(price_minor),
        currency: Currency::inr(),
    })
    .unwrap()
}

fn coupon(discount: DiscountRule, max: Option<Money>, min: Option<Money>) -> Coupon {
    let now = Timestamp::now();
    Coupon::create(NewCoupon {
        code: CouponCode::try_new("PROPTEST").unwrap(),
        description: None,
        discount,
        min_order_amount: min,
        max_discount_amount: max,
        valid_from: now.add_days(-1),
        valid_until: now.add_days(30),
        usage_limit: None,
        applicable_categories: vec![],
    })
    .unwrap()
}

fn completed_payment(amount_minor: i64) -> Payment {
    let mut payment = Payment::create(
        BookingId::new(),
        Money::from_minor(amount_minor),
        Currency::inr(),
        "razorpay",
        Some("order_prop".into()),
    )
    .unwrap();
    payment
        .mark_as_completed(CapturedPayment {
            transaction_id: "pay_prop".into(),
            ..Default::default()
        })
        .unwrap();
    payment
}

// Property: booking totals always reconcile
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn booking_total_is_subtotal_minus_discount_plus_tax(
        participants in participants_strategy(),
        price in minor_amount_strategy(),
        discount_pct in 0u8..=100,
        tax_pct in 0u8..=40,
    ) {
        let mut booking = booking(participants, price);
        prop_assert_eq!(booking.subtotal(), Money::from_minor(price * i64::from(participants)));

        let discount = booking.subtotal().percent_of(Percentage::new(discount_pct));
        booking.apply_discount(discount, Some("PROPTEST".into()), Some(Percentage::new(discount_pct))).unwrap();
        let tax = booking.taxable_amount().percent_of(Percentage::new(tax_pct));
        booking.apply_tax(tax).unwrap();

        prop_assert_eq!(booking.total_amount(), booking.subtotal() - discount + tax);
        prop_assert!(!booking.total_amount().is_negative());
    }

    #[test]
    fn discount_above_subtotal_is_rejected(
        participants in participants_strategy(),
        price in minor_amount_strategy(),
        excess in 1i64..1_000_000,
    ) {
        let mut booking = booking(participants, price);
        let before = booking.total_amount();

        let too_much = booking.subtotal() + Money::from_minor(excess);
        prop_assert!(booking.apply_discount(too_much, None, None).is_err());
        prop_assert_eq!(booking.total_amount(), before);
    }

    #[test]
    fn booking_refund_never_exceeds_total(
        price in minor_amount_strategy(),
        refund in 0i64..20_000_000,
    ) {
        let mut booking = booking(1, price);
        booking.cancel(UserId::new(), "change of plans").unwrap();

        let result = booking.process_refund(Money::from_minor(refund));
        if refund <= price {
            prop_assert!(result.is_ok());
            prop_assert_eq!(booking.refund_amount(), Some(Money::from_minor(refund)));
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(booking.refund_amount(), None);
        }
    }
}

// Property: coupon discounts stay within their caps
proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn percentage_discount_respects_cap_and_order(
        order in 0i64..10_000_000,
        pct in 0u8..=100,
        cap in proptest::option::of(minor_amount_strategy()),
    ) {
        let max = cap.map(Money::from_minor);
        let coupon = coupon(DiscountRule::percentage(pct).unwrap(), max, None);

        let discount = coupon.calculate_discount(Money::from_minor(order)).unwrap();

        prop_assert!(discount <= Money::from_minor(order));
        prop_assert!(!discount.is_negative());
        if let Some(max) = max {
            prop_assert!(discount <= max);
        }
    }

    #[test]
    fn fixed_discount_never_exceeds_order(
        order in 0i64..10_000_000,
        fixed in minor_amount_strategy(),
    ) {
        let coupon = coupon(DiscountRule::fixed(Money::from_minor(fixed)).unwrap(), None, None);

        let discount = coupon.calculate_discount(Money::from_minor(order)).unwrap();

        prop_assert_eq!(discount, Money::from_minor(fixed.min(order)));
    }

    #[test]
    fn orders_below_minimum_get_no_discount(
        min in 2i64..10_000_000,
        pct in 1u8..=100,
    ) {
        let coupon = coupon(DiscountRule::percentage(pct).unwrap(), None, Some(Money::from_minor(min)));

        let discount = coupon.calculate_discount(Money::from_minor(min - 1)).unwrap();

        prop_assert_eq!(discount, Money::ZERO);
    }
}

// Property: payment refunds accumulate up to the captured amount
proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn partial_refunds_accumulate_without_exceeding_amount(
        amount in minor_amount_strategy(),
        refunds in proptest::collection::vec(1i64..5_000_000, 1..8),
    ) {
        let mut payment = completed_payment(amount);
        let mut accepted = Money::ZERO;

        for (i, refund) in refunds.into_iter().enumerate() {
            let refund = Money::from_minor(refund);
            let fits = refund <= payment.remaining_refundable();
            let result = payment.process_partial_refund(refund, format!("rfnd_{}", i), None);
            if fits {
                prop_assert!(result.is_ok());
                accepted = accepted + refund;
            } else {
                prop_assert!(result.is_err());
            }
            prop_assert!(payment.refunded_amount() <= payment.amount());
            prop_assert_eq!(payment.refunded_amount(), accepted);
            prop_assert_eq!(payment.remaining_refundable(), payment.amount() - accepted);
        }
    }

    #[test]
    fn full_refund_after_partial_refunds_the_remainder(
        amount in 2i64..10_000_000,
        first in 1i64..10_000_000,
    ) {
        let first = first.min(amount - 1);
        let mut payment = completed_payment(amount);

        payment.process_partial_refund(Money::from_minor(first), "rfnd_a", None).unwrap();
        payment.process_full_refund("rfnd_b", None).unwrap();

        prop_assert!(payment.is_fully_refunded());
        prop_assert_eq!(payment.refunded_amount(), Money::from_minor(amount));
    }
}

// Property: gift card balances only go down and stay in range
proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn gift_card_balance_stays_between_zero_and_amount(
        amount in minor_amount_strategy(),
        draws in proptest::collection::vec(1i64..5_000_000, 1..10),
    ) {
        let mut card = GiftCard::issue(
            Money::from_minor(amount),
            Currency::inr(),
            GiftCardDetails::default(),
            365,
        )
        .unwrap();
        let mut spent = Money::ZERO;

        for draw in draws {
            let before = card.balance();
            match card.use_balance(Money::from_minor(draw), BookingId::new(), UserId::new()) {
                Ok(tx) => {
                    prop_assert_eq!(tx.amount_used(), Money::from_minor(draw).min(before));
                    prop_assert_eq!(tx.balance_after(), card.balance());
                    spent = spent + tx.amount_used();
                }
                Err(_) => prop_assert!(before.is_zero()),
            }
            prop_assert!(card.balance() <= card.amount());
            prop_assert!(!card.balance().is_negative());
            prop_assert_eq!(card.balance(), card.amount() - spent);
        }
    }
}
