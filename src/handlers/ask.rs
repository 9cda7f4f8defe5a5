//! Ask handler: streams the model's answer, then optionally runs its code.

use std::io::{self, Write};

use anyhow::Result;
use tracing::info;

use crate::{
    config::Config,
    formatter::{first_code_block_for, format_code_response},
    llm::{build_prompt, ChatMessage, ChatOptions, LlmClient, Role},
    printer::{print_outcome, MarkdownPrinter, TextPrinter},
};

const SYSTEM_ROLE: &str = "You are a helpful coding assistant. Answer precisely and keep code runnable as-is.";

pub struct AskRequest<'a> {
    pub question: &'a str,
    pub language: &'a str,
    pub model: &'a str,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: Option<u32>,
    pub markdown: bool,
    pub run_code: bool,
}

/// Returns whether every step succeeded.
pub async fn run(cfg: &Config, req: AskRequest<'_>) -> Result<bool> {
    let client = LlmClient::from_config(cfg)?;
    let messages = vec![
        ChatMessage::new(Role::System, SYSTEM_ROLE),
        ChatMessage::new(Role::User, build_prompt(req.question, req.language)),
    ];
    let opts = ChatOptions {
        model: req.model.to_string(),
        temperature: req.temperature,
        top_p: req.top_p,
        max_tokens: req.max_tokens,
    };

    let markdown = req.markdown;
    let answer = client
        .chat(messages, opts, |chunk| {
            if !markdown {
                print!("{}", chunk);
                io::stdout().flush().ok();
            }
        })
        .await?;

    if answer.trim().is_empty() {
        TextPrinter { color: Some("red") }
            .print("Sorry, I couldn't generate a response. Please try rephrasing your question.");
        return Ok(false);
    }
    let formatted = format_code_response(&answer);
    if markdown {
        MarkdownPrinter::default().print(&formatted);
    } else {
        println!();
    }

    if !req.run_code {
        return Ok(true);
    }
    let Some(block) = first_code_block_for(&formatted, req.language) else {
        TextPrinter { color: Some("red") }.print("The answer has no code block to run");
        return Ok(false);
    };
    info!(language = req.language, hint = ?block.lang, "running code from answer");

    let executor = super::executor_from_config(cfg);
    let outcome = executor.execute(&block.code, req.language).await;
    print_outcome(&outcome, req.language, executor.is_markup(req.language) && outcome.success);
    Ok(outcome.success)
}
