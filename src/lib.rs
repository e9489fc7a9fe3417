pub mod closest;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod league;
pub mod logging;
pub mod report;
pub mod series;
pub mod source;
pub mod standings;
pub mod synthetic;
