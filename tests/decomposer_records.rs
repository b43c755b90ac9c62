//! Integration tests for grammar-driven decomposition

use xrec::xrec::decomposing::{DecomposeError, Decomposer};
use xrec::xrec::element::Element;
use xrec::xrec::loader::{LoaderError, RecordLoader};
use xrec::xrec::report::CollectingReporter;
use xrec::xrec::scanning::Span;
use xrec::xrec::testing::{
    load_grammar, ENTRY_RECORDS, NESTED_GRAMMAR, NESTED_RECORD, RECORD_GRAMMAR,
};

fn span_of(tag: &str, text: &str) -> Span {
    Span::new(tag, text.lines().map(str::to_string).collect())
}

#[test]
fn repeated_slot_preserves_document_order() {
    // record (id,value+): two values arrive in order
    let reporter = CollectingReporter::new();
    let loader = RecordLoader::from_grammar_str(RECORD_GRAMMAR, "inline", &reporter).unwrap();
    let records = loader.decompose_str(ENTRY_RECORDS).unwrap();

    let second = &records[1];
    let tags: Vec<&str> = second.children().iter().map(Element::tag).collect();
    assert_eq!(tags, vec!["id", "value", "value"]);

    let values: Vec<&str> = second
        .children()
        .iter()
        .filter(|c| c.tag() == "value")
        .map(|c| match c {
            Element::Leaf(leaf) => leaf.text(),
            other => panic!("expected leaf value, got {:?}", other),
        })
        .collect();
    assert_eq!(values, vec!["y", "z"]);
}

#[test]
fn ordered_slots_accept_declaration_order() {
    let grammar = load_grammar(RECORD_GRAMMAR);
    let reporter = CollectingReporter::new();
    let mut decomposer = Decomposer::new(&grammar, &reporter);

    let span = span_of("record", "<record>\n<id>7</id>\n<value>x</value>\n</record>");
    let element = decomposer.decompose_span(&span).unwrap();
    let tags: Vec<&str> = element.children().iter().map(Element::tag).collect();
    assert_eq!(tags, vec!["id", "value"]);
}

#[test]
fn reordering_against_the_grammar_is_fatal() {
    let grammar = load_grammar(RECORD_GRAMMAR);
    let reporter = CollectingReporter::new();
    let mut decomposer = Decomposer::new(&grammar, &reporter);

    // value before id: the one-slot lookahead admits the value, after which
    // the id line has no slot left to match
    let span = span_of("record", "<record>\n<value>x</value>\n<id>7</id>\n</record>");
    assert!(matches!(
        decomposer.decompose_span(&span),
        Err(DecomposeError::UnmatchedLine { .. })
    ));
}

#[test]
fn nested_composites_recurse() {
    let grammar = load_grammar(NESTED_GRAMMAR);
    let reporter = CollectingReporter::new();
    let mut decomposer = Decomposer::new(&grammar, &reporter);

    let element = decomposer
        .decompose_span(&span_of("record", NESTED_RECORD.trim_end()))
        .unwrap();

    let names = element.child_by_tag("names").unwrap();
    assert_eq!(names.children().len(), 2);

    // pre-order: first name leaf in document order
    let first_name = element.child_by_tag("name").unwrap();
    match first_name {
        Element::Leaf(leaf) => assert_eq!(leaf.text(), "ada"),
        other => panic!("expected leaf, got {:?}", other),
    }

    // absent tag is None, never a panic
    assert!(element.child_by_tag("absent").is_none());
}

#[test]
fn repeated_instances_on_a_single_line_decompose() {
    // the whole record fits on one line; the repeated slot peels one
    // complete instance at a time off the line
    let grammar = load_grammar("<!ELEMENT a (b+)>\n");
    let reporter = CollectingReporter::new();
    let mut decomposer = Decomposer::new(&grammar, &reporter);

    let element = decomposer
        .decompose_span(&span_of("a", "<a><b>x</b><b>y</b></a>"))
        .unwrap();

    let children = element.children();
    assert_eq!(children.len(), 2);
    let texts: Vec<&str> = children
        .iter()
        .map(|c| match c {
            Element::Leaf(leaf) => leaf.text(),
            other => panic!("expected leaf b, got {:?}", other),
        })
        .collect();
    assert_eq!(texts, vec!["x", "y"]);
}

#[test]
fn alternation_slot_accepts_either_type() {
    let grammar = load_grammar(NESTED_GRAMMAR);
    let reporter = CollectingReporter::new();
    let mut decomposer = Decomposer::new(&grammar, &reporter);

    let with_note = span_of(
        "record",
        "<record>\n<id>1</id>\n<names>\n<name>n</name>\n</names>\n<note>x</note>\n</record>",
    );
    assert!(decomposer.decompose_span(&with_note).is_ok());

    let with_comment = span_of(
        "record",
        "<record>\n<id>1</id>\n<names>\n<name>n</name>\n</names>\n<comment>x</comment>\n</record>",
    );
    assert!(decomposer.decompose_span(&with_comment).is_ok());
}

#[test]
fn end_to_end_stream_decomposition() {
    let reporter = CollectingReporter::new();
    let loader = RecordLoader::from_grammar_str(RECORD_GRAMMAR, "inline", &reporter).unwrap();
    let records = loader.decompose_str(ENTRY_RECORDS).unwrap();

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(
        first.attributes().unwrap().get("sys").map(String::as_str),
        Some("a")
    );
    match first.child_by_tag("id").unwrap() {
        Element::Leaf(leaf) => assert_eq!(leaf.text(), "1"),
        other => panic!("expected leaf id, got {:?}", other),
    }
}

#[test]
fn stream_with_a_bad_record_surfaces_the_failure() {
    let reporter = CollectingReporter::new();
    let loader = RecordLoader::from_grammar_str(RECORD_GRAMMAR, "inline", &reporter).unwrap();
    // second line of the record matches neither slot 1 nor slot 2
    let input = "<record>\n<bogus>x</bogus>\n</record>\n";
    let result = loader.decompose_str(input);
    assert!(matches!(result, Err(LoaderError::Decompose(_))));
    assert_eq!(reporter.kinds(), vec!["UNMATCHED_LINE"]);
}
