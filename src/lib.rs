//! Ride Concierge - Conversational Ride Booking Webhook
//!
//! This crate turns a three-turn dialog (pick a ride type, get a fare,
//! confirm) into calls against a ride-hailing API, threading trip state
//! through the dialog platform's contexts.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
