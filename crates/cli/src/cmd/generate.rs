use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::Result;
use reggen_core::config::loader::{ConfigLoader, default_config_path};
use reggen_core::document::MarkdownFileSession;
use reggen_core::generator::{BuiltinGenerator, CannedGenerator, ContentGenerator};
use reggen_core::workflow::Workflow;
use reggen_core::InsertOutcome;

use crate::cmd::block_on;
use crate::cmd::output::{ConsoleNotifier, describe_outcome};
use crate::logging;
use crate::GenerateArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: &GenerateArgs) -> Result<()> {
    let cfg = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => {
            eprintln!("FAIL rgen generate");
            eprintln!("{e}");
            if config.is_none() {
                eprintln!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    };

    logging::init(&cfg.logging)?;
    tracing::debug!(profile = %cfg.active_profile, doc = %args.doc.display(), "starting generation");

    let latency = Duration::from_millis(cfg.latency_ms);
    let generator: Box<dyn ContentGenerator> = match &cfg.responses_dir {
        Some(dir) => Box::new(CannedGenerator::new(dir).with_latency(latency)),
        None => Box::new(BuiltinGenerator::new().with_latency(latency)),
    };
    let notifier = ConsoleNotifier;
    let workflow = Workflow::new(generator.as_ref(), &notifier)
        .with_anchor(cfg.fallback_anchor)
        .with_prompts(cfg.prompts.clone());

    match block_on(execute(&workflow, args))? {
        Ok(outcome) => {
            println!("OK   rgen generate");
            match &args.section {
                Some(section) => println!("section: {section}"),
                None => println!("section: (free-form)"),
            }
            println!("document: {}", args.doc.display());
            println!("result: {}", describe_outcome(&outcome));
        }
        Err(e) => {
            eprintln!("FAIL rgen generate");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn execute(workflow: &Workflow<'_>, args: &GenerateArgs) -> Result<InsertOutcome> {
    let mut session = MarkdownFileSession::open(&args.doc).await?;

    let outcome = match (&args.section, &args.prompt) {
        (Some(section), _) => workflow.generate_section(&mut session, section).await?,
        (None, prompt) => {
            let prompt = prompt.as_deref().unwrap_or_default();
            workflow.generate_freeform(&mut session, prompt).await?
        }
    };

    Ok(outcome)
}
