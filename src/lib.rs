pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod files;
pub mod git;
pub mod shell;
pub mod ui;
pub mod workflow;

pub use error::{ReleaseError, Result};
