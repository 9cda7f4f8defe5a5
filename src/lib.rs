//! Terminal coding assistant: ask a hosted LLM a coding question and run the
//! code in its answer through a local interpreter.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod executor;
pub mod formatter;
pub mod handlers;
pub mod llm;
pub mod printer;
pub mod utils;
pub mod voice;
