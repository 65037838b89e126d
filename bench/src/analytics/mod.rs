pub mod clock;
pub mod ewma;
pub mod metrics;
pub mod report_builder;
pub mod sampler;
