//! External integrations
//!
//! Folio talks to exactly one external system, the analytics server that owns
//! the report assets. Its wire protocol is kept behind
//! [`AnalyticsServer`](tableau::AnalyticsServer).
//!
//! - [`tableau`] - Tableau REST API session, models and connection factory

pub mod tableau;
