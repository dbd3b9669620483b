//! Fulfillment address library modules.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
