//! Honeylure - Agentic Scam-Engagement Honeypot
//!
//! This crate engages inbound scam messages through automated decoy personas,
//! keeps promising conversations alive, and harvests identifying artifacts
//! (payment handles, account numbers, phone numbers, links) from the
//! adversary's messages.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
