pub mod orchestration;

pub use orchestration::{run, run_with, Command, ReleaseArgs, COMMANDS};
