#![forbid(unsafe_code)]

pub mod cli;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod logging;
pub mod resolve;
pub mod schedule;
pub mod store;
