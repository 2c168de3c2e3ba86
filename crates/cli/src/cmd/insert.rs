use color_eyre::eyre::{Result, WrapErr};
use reggen_core::config::types::LoggingConfig;
use reggen_core::document::MarkdownFileSession;
use reggen_core::{GeneratedText, InsertOutcome, InsertionResolver, PlaceholderTag, Section};

use crate::cmd::block_on;
use crate::cmd::output::describe_outcome;
use crate::logging;
use crate::InsertArgs;

pub fn run(args: &InsertArgs) -> Result<()> {
    logging::init(&LoggingConfig::default())?;

    match block_on(execute(args))? {
        Ok(outcome) => {
            println!("OK   rgen insert");
            println!("document: {}", args.doc.display());
            println!("result: {}", describe_outcome(&outcome));
        }
        Err(e) => {
            eprintln!("FAIL rgen insert");
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn execute(args: &InsertArgs) -> Result<InsertOutcome> {
    let text = match (&args.source.text, &args.source.file) {
        (Some(text), _) => GeneratedText::new(text.as_str()),
        (None, Some(path)) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            GeneratedText::new(raw.trim_end())
        }
        (None, None) => GeneratedText::new(""),
    };

    // Resolve the section before touching the document.
    let tag = match (&args.target.tag, &args.target.section) {
        (Some(tag), _) => Some(PlaceholderTag::new(tag.as_str())),
        (None, Some(section)) => Some(section.parse::<Section>()?.tag()),
        (None, None) => None,
    };

    let mut session = MarkdownFileSession::open(&args.doc).await?;
    let resolver = InsertionResolver::new(args.anchor.into());

    let outcome = match tag {
        Some(tag) => resolver.insert_by_section(&mut session, &tag, &text).await?,
        None => resolver.insert_at_cursor(&mut session, &text).await?,
    };

    Ok(outcome)
}
