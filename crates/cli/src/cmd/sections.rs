use reggen_core::Section;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    section: &'static str,
    #[tabled(rename = "Tag")]
    tag: &'static str,
    #[tabled(rename = "Title")]
    title: &'static str,
}

pub fn run() {
    let rows: Vec<SectionRow> = Section::all()
        .into_iter()
        .map(|s| SectionRow { section: s.as_str(), tag: s.spec().tag, title: s.title() })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{}", table);
}
