use color_eyre::eyre::Result;
use reggen_core::config::types::LoggingConfig;
use reggen_core::document::MarkdownFileSession;
use reggen_core::resolver::{Diagnostics, TagStatus, enumerate};
use tabled::{settings::Style, Table, Tabled};

use crate::cmd::block_on;
use crate::logging;
use crate::InspectArgs;

#[derive(Tabled)]
struct ControlRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Title")]
    title: String,
}

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Matches")]
    matches: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    logging::init(&LoggingConfig { level: "warn".to_string(), ..LoggingConfig::default() })?;

    let diagnostics = block_on(async {
        let session = MarkdownFileSession::open(&args.doc).await?;
        enumerate(&session).await
    })?;

    let diagnostics = match diagnostics {
        Ok(d) => d,
        Err(e) => {
            eprintln!("FAIL rgen inspect");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
        return Ok(());
    }

    print_tables(&diagnostics);
    Ok(())
}

fn print_tables(diagnostics: &Diagnostics) {
    if diagnostics.controls.is_empty() {
        println!("(no content controls found)");
    } else {
        let rows: Vec<ControlRow> = diagnostics
            .controls
            .iter()
            .map(|c| ControlRow {
                id: c.id.to_string(),
                tag: c.tag.to_string(),
                title: c.title.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }

    let rows: Vec<SectionRow> = diagnostics
        .sections
        .iter()
        .map(|s| SectionRow {
            section: s.section.to_string(),
            tag: s.tag.to_string(),
            matches: s.matches,
            status: match s.status() {
                TagStatus::Ok => "ok",
                TagStatus::Missing => "missing (fallback will be used)",
                TagStatus::Duplicated => "duplicated (first match is filled)",
            },
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));

    let problems = diagnostics.problems().count();
    println!("\nproblems: {problems}");
}
