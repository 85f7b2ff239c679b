pub mod config;
pub mod gateway;
pub mod logger;
pub mod model;
pub mod prompts;
pub mod queue;
pub mod regions;
pub mod report;
pub mod session;
pub mod ui;
