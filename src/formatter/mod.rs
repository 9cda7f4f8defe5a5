//! Response formatting: fenced code block grouping and extraction.

const FENCE: &str = "```";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Info string after the opening fence, if any.
    pub lang: Option<String>,
    pub code: String,
}

/// Regroup a Markdown answer so that every fenced block is kept as one unit.
/// An unterminated block is flushed as-is at the end.
pub fn format_code_response(response: &str) -> String {
    if response.is_empty() {
        return "No response received".to_string();
    }

    let mut formatted: Vec<String> = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in response.split('\n') {
        if line.trim().starts_with(FENCE) {
            block.push(line);
            if in_block {
                formatted.push(block.join("\n"));
                block.clear();
            }
            in_block = !in_block;
        } else if in_block {
            block.push(line);
        } else {
            formatted.push(line.to_string());
        }
    }
    if !block.is_empty() {
        formatted.push(block.join("\n"));
    }

    formatted.join("\n")
}

/// All fenced code blocks in order of appearance. An unterminated trailing
/// block is included.
pub fn extract_code_blocks(response: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<(Option<String>, Vec<&str>)> = None;

    for line in response.lines() {
        let trimmed = line.trim();
        match (trimmed.strip_prefix(FENCE), current.take()) {
            (Some(_), Some((lang, body))) => blocks.push(CodeBlock { lang, code: body.join("\n") }),
            (Some(info), None) => {
                let info = info.trim();
                let lang = (!info.is_empty()).then(|| info.to_string());
                current = Some((lang, Vec::new()));
            }
            (None, Some((lang, mut body))) => {
                body.push(line);
                current = Some((lang, body));
            }
            (None, None) => {}
        }
    }
    if let Some((lang, body)) = current {
        blocks.push(CodeBlock { lang, code: body.join("\n") });
    }
    blocks
}

/// First block tagged for `language`, falling back to the first block.
pub fn first_code_block_for(response: &str, language: &str) -> Option<CodeBlock> {
    let blocks = extract_code_blocks(response);
    let wanted = canonical(language);
    blocks
        .iter()
        .find(|b| b.lang.as_deref().map(canonical).as_deref() == Some(wanted.as_str()))
        .or_else(|| blocks.first())
        .cloned()
}

fn canonical(lang: &str) -> String {
    let lower = lang.trim().to_ascii_lowercase();
    match lower.as_str() {
        "py" | "python3" => "python".into(),
        "js" | "node" | "javascript" => "javascript".into(),
        "rb" => "ruby".into(),
        "htm" => "html".into(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = "Here is how:\n\n```python\n# greet\nprint('hi')\n```\n\nKey points:\n- it prints\n\n```js\nconsole.log('hi')\n```";

    #[test]
    fn empty_response_placeholder() {
        assert_eq!(format_code_response(""), "No response received");
    }

    #[test]
    fn format_keeps_text_and_blocks() {
        assert_eq!(format_code_response(ANSWER), ANSWER);
    }

    #[test]
    fn format_flushes_unterminated_block() {
        let text = "intro\n```python\nprint(1)";
        assert_eq!(format_code_response(text), text);
    }

    #[test]
    fn extracts_blocks_with_hints() {
        let blocks = extract_code_blocks(ANSWER);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].lang.as_deref(), Some("python"));
        assert_eq!(blocks[0].code, "# greet\nprint('hi')");
        assert_eq!(blocks[1].lang.as_deref(), Some("js"));
        assert_eq!(blocks[1].code, "console.log('hi')");
    }

    #[test]
    fn indented_fence_and_missing_hint() {
        let blocks = extract_code_blocks("  ```\n  echo hi\n  ```\n");
        assert_eq!(blocks, vec![CodeBlock { lang: None, code: "  echo hi".into() }]);
    }

    #[test]
    fn picks_block_matching_language() {
        let js = first_code_block_for(ANSWER, "JavaScript").unwrap();
        assert_eq!(js.code, "console.log('hi')");
        let fallback = first_code_block_for(ANSWER, "Ruby").unwrap();
        assert_eq!(fallback.lang.as_deref(), Some("python"));
        assert!(first_code_block_for("no code here", "Python").is_none());
    }
}
