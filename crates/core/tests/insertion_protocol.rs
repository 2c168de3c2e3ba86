use reggen_core::document::{Block, DocumentTree, MemorySession};
use reggen_core::generator::StaticGenerator;
use reggen_core::notify::TracingNotifier;
use reggen_core::workflow::Workflow;
use reggen_core::{
    GeneratedText, InsertError, InsertOutcome, InsertionResolver, Section, normalize, resolve_tag,
};

fn text(s: &str) -> GeneratedText {
    GeneratedText::from(s)
}

#[tokio::test]
async fn single_match_is_replaced_with_normalized_text() {
    let mut session = MemorySession::new(
        DocumentTree::new()
            .with_text("# CTA\n\n")
            .with_control("cc_intro", Some("Introduction"), "placeholder"),
    );
    let input = text("Line one.\\nLine two.");

    let outcome = InsertionResolver::default()
        .insert_by_section(&mut session, &resolve_tag("intro").unwrap(), &input)
        .await
        .unwrap();

    match outcome {
        InsertOutcome::ReplacedAtTag { control, ignored_duplicates } => {
            assert_eq!(control.title.as_deref(), Some("Introduction"));
            assert_eq!(ignored_duplicates, 0);
        }
        other => panic!("expected ReplacedAtTag, got {other:?}"),
    }
    let content = &session.tree().controls().next().unwrap().content;
    assert_eq!(content, &normalize(input.as_str()));
}

#[tokio::test]
async fn missing_tag_appends_paragraph_at_end() {
    let mut session = MemorySession::new(
        DocumentTree::new()
            .with_control("cc_intro", None, "intro")
            .with_text("closing remarks\n"),
    );

    let outcome = InsertionResolver::default()
        .insert_by_section(&mut session, &resolve_tag("objectives").unwrap(), &text("A\\nB"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::FallbackAppended);
    assert_eq!(session.tree().blocks().last(), Some(&Block::Paragraph("A\nB".to_string())));
    assert_eq!(session.tree().controls().next().unwrap().content, "intro");
}

#[tokio::test]
async fn duplicate_tags_fill_only_the_first() {
    let tree = DocumentTree::new()
        .with_control("cc_intro", Some("First"), "one")
        .with_text("between\n")
        .with_control("cc_intro", Some("Second"), "two \u{1F4C4} bytes");
    let second_before = tree.controls().nth(1).unwrap().clone();
    let mut session = MemorySession::new(tree);

    let outcome = InsertionResolver::default()
        .insert_by_section(&mut session, &"cc_intro".into(), &text("filled"))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::ReplacedAtTag {
            control: session.tree().controls().next().unwrap().handle(),
            ignored_duplicates: 1,
        }
    );
    let controls: Vec<_> = session.tree().controls().cloned().collect();
    assert_eq!(controls[0].content, "filled");
    assert_eq!(controls[1], second_before);
}

#[tokio::test]
async fn cursor_insert_without_selection_leaves_document_unchanged() {
    let tree = DocumentTree::new().with_text("body\n").with_control("cc_intro", None, "x");
    let mut session = MemorySession::new(tree.clone());

    let err = InsertionResolver::default()
        .insert_at_cursor(&mut session, &text("free\\nform"))
        .await
        .unwrap_err();

    assert!(matches!(err, InsertError::NoActiveSelection));
    assert_eq!(session.tree(), &tree);
    assert_eq!(session.flush_count(), 0);
}

#[tokio::test]
async fn cursor_insert_replaces_selection() {
    let mut session =
        MemorySession::new(DocumentTree::new().with_text("body\n").with_selection("old"));

    let outcome = InsertionResolver::default()
        .insert_at_cursor(&mut session, &text("free\\nform"))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::ReplacedSelection);
    assert_eq!(session.tree().selection().unwrap().content, "free\nform");
}

#[tokio::test]
async fn methodology_end_to_end() {
    let tag = resolve_tag("methodology").unwrap();
    assert_eq!(tag.as_str(), "cc_methodology");

    let generator = StaticGenerator::new().with_section(
        Section::Methodology,
        "Study Design: randomized.\\nPatient Population: adults.",
    );
    let notifier = TracingNotifier;
    let mut session = MemorySession::new(
        DocumentTree::new()
            .with_text("# Protocol\n\n")
            .with_control("cc_methodology", Some("Methodology Section"), ""),
    );

    let outcome = Workflow::new(&generator, &notifier)
        .generate_section(&mut session, "methodology")
        .await
        .unwrap();

    assert!(matches!(outcome, InsertOutcome::ReplacedAtTag { .. }));
    let control = session.tree().controls().next().unwrap();
    assert_eq!(control.title.as_deref(), Some("Methodology Section"));
    assert_eq!(control.content, "Study Design: randomized.\nPatient Population: adults.");
    assert!(!control.content.contains("\\n"));
}

#[tokio::test]
async fn repeated_insertion_is_idempotent() {
    let mut session =
        MemorySession::new(DocumentTree::new().with_control("cc_intro", None, "placeholder"));
    let resolver = InsertionResolver::default();
    let input = text("same\\ntext");

    resolver.insert_by_section(&mut session, &"cc_intro".into(), &input).await.unwrap();
    let once = session.tree().clone();
    resolver.insert_by_section(&mut session, &"cc_intro".into(), &input).await.unwrap();

    assert_eq!(session.tree(), &once);
}
