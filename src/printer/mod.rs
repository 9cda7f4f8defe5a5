//! Printers: text, markdown (termimad), and execution results.

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::executor::{render, ExecutionOutcome};

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    pub fn print(&self, text: &str) {
        match self.color {
            Some("green") => println!("{}", text.green()),
            Some("cyan") => println!("{}", text.cyan()),
            Some("magenta") => println!("{}", text.magenta()),
            Some("red") => eprintln!("{}", text.red()),
            _ => println!("{}", text),
        }
    }
}

pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl Default for MarkdownPrinter {
    fn default() -> Self {
        Self { skin: MadSkin::default() }
    }
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }
}

/// Show an execution result: a preview for markup, the output on success,
/// an error banner on failure.
pub fn print_outcome(outcome: &ExecutionOutcome, language: &str, markup: bool) {
    if markup {
        TextPrinter { color: Some("cyan") }.print("Preview:");
        println!("{}", render(&outcome.message, language));
    } else if outcome.success {
        TextPrinter { color: Some("cyan") }.print("Result:");
        TextPrinter { color: Some("green") }.print(&outcome.message);
    } else {
        TextPrinter { color: Some("red") }.print(&outcome.message);
    }
}
