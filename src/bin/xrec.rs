//! Command-line interface for xrec
//! Decomposes a line-oriented record stream against a DTD-subset grammar and
//! prints the resulting element trees.
//!
//! Usage:
//!   xrec `<input>` --grammar `<decl-file>` [--format `<format>`]

use clap::{Arg, ArgAction, Command};
use xrec::xrec::grammar::GrammarLoader;
use xrec::xrec::loader::RecordLoader;
use xrec::xrec::report::StderrReporter;

fn main() {
    let matches = Command::new("xrec")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decompose record streams against a DTD-subset grammar")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Path to the record stream")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .help("Path to the grammar declaration file")
                .required(true),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: 'tags' (indented tagged text) or 'json'")
                .default_value("tags"),
        )
        .arg(
            Arg::new("warn-undeclared")
                .long("warn-undeclared")
                .help("Warn about tags referenced in slots but never declared")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .expect("input is required");
    let grammar = matches
        .get_one::<String>("grammar")
        .expect("grammar is required");
    let format = matches.get_one::<String>("format").expect("has default");

    let reporter = StderrReporter;
    let decls = std::fs::read_to_string(grammar).unwrap_or_else(|e| {
        eprintln!("Failed to read grammar '{}': {}", grammar, e);
        std::process::exit(1);
    });
    let tree = GrammarLoader::new(&reporter)
        .warn_undeclared(matches.get_flag("warn-undeclared"))
        .load_str(&decls, grammar)
        .unwrap_or_else(|e| {
            eprintln!("Failed to load grammar: {}", e);
            std::process::exit(1);
        });
    let loader = RecordLoader::new(tree, &reporter);

    let records = loader.decompose_path(input).unwrap_or_else(|e| {
        eprintln!("Failed to decompose records: {}", e);
        std::process::exit(1);
    });

    for record in records {
        let formatted = match format.as_str() {
            "tags" => record.serialize(0),
            "json" => {
                let mut json = serde_json::to_string_pretty(&record).unwrap_or_else(|e| {
                    eprintln!("Error formatting record: {}", e);
                    std::process::exit(1);
                });
                json.push('\n');
                json
            }
            other => {
                eprintln!("Unknown format '{}'; expected 'tags' or 'json'", other);
                std::process::exit(1);
            }
        };
        print!("{}", formatted);
    }
}
