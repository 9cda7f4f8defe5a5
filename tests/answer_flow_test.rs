use codeassist::{
    executor::{render, CodeExecutor},
    formatter::{first_code_block_for, format_code_response},
};

const HTML_ANSWER: &str = "A minimal page:\n\n```html\n<h1>Hello</h1>\n```\n\nKey points:\n- headings use h1..h6";

const CSS_ANSWER: &str = "Style it:\n```css\nh1 { color: teal; }\n```";

#[tokio::test]
async fn html_answer_is_previewed_verbatim() {
    let formatted = format_code_response(HTML_ANSWER);
    let block = first_code_block_for(&formatted, "HTML").unwrap();
    let exec = CodeExecutor::default();
    let outcome = exec.execute(&block.code, "HTML").await;
    assert!(outcome.success);
    assert_eq!(render(&outcome.message, "HTML"), "<h1>Hello</h1>");
}

#[tokio::test]
async fn css_answer_is_wrapped_for_preview() {
    let block = first_code_block_for(CSS_ANSWER, "CSS").unwrap();
    let outcome = CodeExecutor::default().execute(&block.code, "CSS").await;
    assert!(outcome.success);
    assert_eq!(
        render(&outcome.message, "CSS"),
        "<style>\nh1 { color: teal; }\n</style>"
    );
}

#[tokio::test]
async fn answer_in_unrunnable_language_is_rejected() {
    let answer = "```rust\nfn main() {}\n```";
    let block = first_code_block_for(answer, "Rust").unwrap();
    let outcome = CodeExecutor::default().execute(&block.code, "Rust").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Language Rust is not supported");
}
