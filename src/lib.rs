// Library exports
pub mod classify;
pub mod config;
pub mod crawl;
pub mod error;
pub mod logging;
pub mod report;
pub mod session;
pub mod timefmt;
pub mod timeparse;
