pub mod actor_failure;
pub mod actor_kind;
pub mod actor_stats;
pub mod params;
pub mod report;
pub mod sample_record;
pub mod summary;
