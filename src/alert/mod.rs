//! Alerting: turning rainfall depths and reservoir telemetry into severity
//! tiers and actions.

pub mod discharge;
pub mod severity;
