//! Command implementations.

pub mod analyze;
pub mod classify;
pub mod config;
pub mod fragments;
pub mod suspects;

pub use self::analyze::execute_analyze;
pub use self::classify::execute_classify;
pub use self::config::execute_config;
pub use self::fragments::execute_fragments;
pub use self::suspects::execute_suspects;
