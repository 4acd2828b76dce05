pub mod changelog;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod files;
pub mod forge;
pub mod result;
pub mod template;
pub mod testgen;

pub use result::Result;
