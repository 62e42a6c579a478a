//! Edge Routes
//!
//! Route handlers organized by functionality.

pub mod embed;
pub mod health;
pub mod pricing;
