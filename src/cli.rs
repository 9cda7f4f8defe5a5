use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "codeassist", about = "Ask coding questions and run the answers locally", version)]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
#[command(group(ArgGroup::new("input").args(["voice", "exec"]).multiple(false)))]
pub struct Cli {
    /// The coding question.
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,

    /// Programming language the question is about (case-sensitive, e.g. Python, JavaScript, HTML).
    #[arg(short = 'L', long = "lang")]
    pub lang: Option<String>,

    /// Run the first code block of the answer locally.
    #[arg(short = 'x', long)]
    pub run: bool,

    /// Run a local file (or `-` for stdin) without asking the model.
    #[arg(long, value_name = "FILE")]
    pub exec: Option<String>,

    /// Capture the question through VOICE_COMMAND.
    #[arg(short = 'v', long)]
    pub voice: bool,

    /// Large language model to use.
    #[arg(long)]
    pub model: Option<String>,

    /// Randomness of generated output.
    #[arg(long, default_value_t = 0.0, value_parser = clap::value_parser!(f32))]
    pub temperature: f32,

    /// Limits highest probable tokens (words).
    #[arg(long = "top-p", default_value_t = 1.0, value_parser = clap::value_parser!(f32))]
    pub top_p: f32,

    /// Maximum tokens in the answer.
    #[arg(long = "max-tokens")]
    pub max_tokens: Option<u32>,

    /// Prettify Markdown output (buffer then render at end).
    #[arg(long)]
    pub md: bool,
    /// Disable Markdown prettifying (print chunks as they arrive).
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// List languages; runnable ones are marked.
    #[arg(short = 'l', long = "list-languages", visible_alias = "ll")]
    pub list_languages: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_flags() {
        let cli = Cli::try_parse_from(["codeassist", "sum a list", "--lang", "Python", "-x"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("sum a list"));
        assert_eq!(cli.lang.as_deref(), Some("Python"));
        assert!(cli.run);
    }

    #[test]
    fn voice_and_exec_conflict() {
        assert!(Cli::try_parse_from(["codeassist", "--voice", "--exec", "a.py"]).is_err());
        assert!(Cli::try_parse_from(["codeassist", "--md", "--no-md"]).is_err());
    }
}
