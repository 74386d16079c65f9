pub mod affinity;
pub mod cli;
pub mod commands;
pub mod utils;
