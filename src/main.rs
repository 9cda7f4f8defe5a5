use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use codeassist::{
    catalog, cli,
    config::Config,
    handlers::{self, ask::AskRequest},
    printer::TextPrinter,
    utils,
    voice::AudioHandler,
};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "codeassist=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = cli::Cli::parse();
    let cfg = Config::load();

    if args.list_languages {
        let executor = handlers::executor_from_config(&cfg);
        for category in catalog::CATEGORIES {
            println!("{}", category.name.cyan());
            for (name, desc) in category.languages {
                let mark = if executor.profile(name).is_some() { "*" } else { " " };
                println!(" {} {}: {}", mark, name.bold(), desc);
            }
        }
        println!("\n* can be run with --run / --exec");
        return Ok(ExitCode::SUCCESS);
    }

    let language = args
        .lang
        .clone()
        .or_else(|| cfg.get("DEFAULT_LANGUAGE"))
        .unwrap_or_else(|| "Python".to_string());
    if !catalog::is_known(&language) {
        bail!("unknown language '{}' (see --list-languages)", language);
    }

    if let Some(path) = args.exec.as_deref() {
        let ok = handlers::exec::run(&cfg, path, &language).await?;
        return Ok(exit_code(ok));
    }

    // stdin handling (pipe support with __codeassist__eof__ delimiter)
    let stdin_is_tty = io::stdin().is_terminal();
    let mut prompt_from_stdin = String::new();
    if !stdin_is_tty {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        prompt_from_stdin = utils::strip_eof_marker(&buf).to_string();
    }

    let question = if args.voice {
        // an empty non-TTY stdin (cron, CI, /dev/null) is not a conflict
        if utils::has_piped_prompt(&prompt_from_stdin) {
            bail!("--voice cannot be used with stdin input");
        }
        TextPrinter { color: Some("magenta") }.print("Listening... speak your question");
        let heard = AudioHandler::from_config(&cfg).listen().await?;
        TextPrinter { color: Some("magenta") }.print(&format!("You asked: {}", heard));
        heard
    } else {
        utils::combine_prompt(&prompt_from_stdin, args.prompt.as_deref().unwrap_or_default())
    };
    if question.is_empty() {
        return Err(anyhow!("Provide a question as an argument, via stdin, or with --voice"));
    }

    let model = args
        .model
        .clone()
        .or_else(|| cfg.get("DEFAULT_MODEL"))
        .unwrap_or_else(|| "gemini-1.5-flash".to_string());
    let markdown = if args.no_md {
        false
    } else if args.md {
        true
    } else {
        cfg.get_bool("PRETTIFY_MARKDOWN")
    };

    let ok = handlers::ask::run(
        &cfg,
        AskRequest {
            question: &question,
            language: &language,
            model: &model,
            temperature: args.temperature,
            top_p: args.top_p,
            max_tokens: args.max_tokens,
            markdown,
            run_code: args.run,
        },
    )
    .await?;
    Ok(exit_code(ok))
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
