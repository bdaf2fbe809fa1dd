//! Core business logic for Tadika.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All fee rules, billing plans and payment status calculations live here.
//!
//! # Modules
//!
//! - `catalog` - Fee items, packages and collection rules
//! - `fees` - Fee preview engine (waivers, overrides, totals)
//! - `billing` - Planning of billing instances from a preview
//! - `payments` - Instance status and payment acceptance
//! - `dashboard` - Enrollment balances and the dashboard cache

pub mod billing;
pub mod catalog;
pub mod dashboard;
pub mod fees;
pub mod payments;
