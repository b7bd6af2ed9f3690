//! Short-form video cohort scoring: per-platform median baselines, an
//! IQR upper fence over views, and the analytics and reports built on them.
//!
//! The scorer itself is [`pipeline::stage4_score::score`].

pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod stats;
