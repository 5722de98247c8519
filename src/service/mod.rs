//! Request validation and the popularity-statistics read-through cache.

mod stats;
mod validation;
pub use stats::{synthesize_stats, ProjectStatsService, StatRanges};
pub use validation::{normalize_email, FieldFormat, FieldRule, Payload, RequestValidator};
