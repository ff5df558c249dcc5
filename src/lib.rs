//! FunBookr - Activity booking core
//!
//! Booking lifecycle, payment capture and refunds reconciled from gateway
//! webhooks, and the rewards that hang off a booking: coupons, gift cards
//! and loyalty points.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
