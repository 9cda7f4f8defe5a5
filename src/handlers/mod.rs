//! Command handlers wired from `main`.

pub mod ask;
pub mod exec;

use crate::{
    config::Config,
    executor::{CodeExecutor, ProfileTable},
};

pub fn executor_from_config(cfg: &Config) -> CodeExecutor {
    match cfg.get_secs("EXECUTION_TIMEOUT") {
        Some(timeout) => CodeExecutor::new(ProfileTable::with_timeout(timeout)),
        None => CodeExecutor::default(),
    }
}
