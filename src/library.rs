pub mod cli;
pub mod config;
pub mod constant;
pub mod ec2;
pub mod progress;
pub mod provision;
pub mod shell;
pub mod snapshot;
pub mod table;
