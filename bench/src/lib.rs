pub mod actors;
pub mod analytics;
pub mod args;
pub mod configs;
pub mod error;
pub mod invoker;
pub mod output;
pub mod runner;
pub mod utils;
