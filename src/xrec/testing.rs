//! Testing utilities: verified sample grammars and record streams
//!
//!     Record streams in this format are easy to get subtly wrong by hand —
//!     a stray tag order or an unclosed child makes a test assert against an
//!     input the grammar would never accept, and then the decomposer gets
//!     tuned to the wrong thing. Tests therefore pull their inputs from the
//!     verified samples here instead of inlining ad-hoc strings, and assert
//!     on element-tree shape and content, not on counts.
//!
//!     Keep samples small and named for the feature they exercise; when a
//!     grammar rule changes, this is the single place to update.

use crate::xrec::grammar::{GrammarLoader, GrammarTree};
use crate::xrec::report::CollectingReporter;

/// The workhorse grammar: a corpus of records, each an id plus one or more
/// values, with declared attributes on the record tag.
pub const RECORD_GRAMMAR: &str = "\
<!ELEMENT corpus (record+)>
<!ELEMENT record (id,value+)>
<!ATTLIST record sys>
<!ATTLIST record kind>
";

/// Two well-formed records against [`RECORD_GRAMMAR`], with noise lines
/// between them
pub const ENTRY_RECORDS: &str = "\
preamble to ignore
<record sys=\"a\">
<id>1</id>
<value>x</value>
</record>
interstitial noise
<record>
<id>2</id>
<value>y</value>
<value>z</value>
</record>
trailing noise
";

/// Grammar with an alternation slot and a nested composite child
pub const NESTED_GRAMMAR: &str = "\
<!ELEMENT corpus (record+)>
<!ELEMENT record (id,names,(note|comment))>
<!ELEMENT names (name+)>
";

/// One record against [`NESTED_GRAMMAR`]
pub const NESTED_RECORD: &str = "\
<record>
<id>7</id>
<names>
<name>ada</name>
<name>countess</name>
</names>
<comment>first</comment>
</record>
";

/// Grammar whose two top-level rules produce two root candidates; loading
/// it must fail
pub const TWO_ROOT_GRAMMAR: &str = "\
<!ELEMENT corpus (record+)>
<!ELEMENT archive (record+)>
<!ELEMENT record (id,value+)>
";

/// Load a verified grammar sample, panicking on any condition — samples are
/// supposed to be clean
pub fn load_grammar(decls: &str) -> GrammarTree {
    let reporter = CollectingReporter::new();
    let tree = GrammarLoader::new(&reporter)
        .load_str(decls, "testing")
        .unwrap_or_else(|e| panic!("verified grammar sample failed to load: {}", e));
    assert!(
        reporter.is_empty(),
        "verified grammar sample recorded conditions: {:?}",
        reporter.conditions()
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_load_clean() {
        let record = load_grammar(RECORD_GRAMMAR);
        assert_eq!(record.root().unwrap().tag(), "corpus");

        let nested = load_grammar(NESTED_GRAMMAR);
        assert_eq!(nested.root().unwrap().tag(), "corpus");
    }

    #[test]
    fn test_two_root_sample_really_has_two_roots() {
        let reporter = CollectingReporter::new();
        let result = GrammarLoader::new(&reporter).load_str(TWO_ROOT_GRAMMAR, "testing");
        assert!(result.is_err());
    }
}
