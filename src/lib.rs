pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod output;
pub mod params;
pub mod payloads;
pub mod reflection;
pub mod runner;
pub mod scanner;
pub mod session;
pub mod waf;
