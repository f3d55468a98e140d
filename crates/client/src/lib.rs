pub mod config;
pub mod client;
pub mod team_selector;
pub mod match_flow;
pub mod report;

pub use config::*;
pub use client::*;
pub use team_selector::*;
pub use match_flow::*;
pub use report::*;
