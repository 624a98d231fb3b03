//! Translation orchestration
//!
//! Loads members, the type universe and the proposition table, translates
//! every member and writes the members back out with their conditions.

use crate::cli::output;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use specmine::{
    load_members, save_members, PropositionTable, TranslationSummary, Translator,
    TranslatorConfig, TypeUniverse,
};
use std::path::PathBuf;
use tracing::info;

/// Inputs of the `translate` command
#[derive(Debug, Clone)]
pub struct TranslateArgs {
    pub members: PathBuf,
    pub types: PathBuf,
    pub propositions: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn handle_translate(args: &TranslateArgs, format: OutputFormat) -> i32 {
    match translate(args) {
        Ok(summary) => {
            // Members go to stdout when no output file is given, so the summary moves to stderr
            let report = output::format_summary(&summary, format);
            if args.output.is_some() {
                print!("{}", report);
            } else {
                eprint!("{}", report);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

/// Run the translation described by `args`
pub fn translate(args: &TranslateArgs) -> Result<TranslationSummary> {
    let config = match &args.config {
        Some(path) => TranslatorConfig::from_file(path)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => TranslatorConfig::default(),
    };
    let universe = TypeUniverse::from_file(&args.types).context("loading type universe")?;
    let table =
        PropositionTable::from_file(&args.propositions).context("loading proposition table")?;
    let mut members = load_members(&args.members).context("loading members")?;
    info!(
        "loaded {} members and {} types",
        members.len(),
        universe.len()
    );

    let translator = Translator::new(&universe, &table, config);
    let summary = translator.translate_all(&mut members);

    match &args.output {
        Some(path) => save_members(path, &members).context("writing members")?,
        None => println!(
            "{}",
            serde_json::to_string_pretty(&members).context("serialising members")?
        ),
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_translate_files() {
        let dir = env::temp_dir().join(format!("specmine_translate_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let members = dir.join("members.json");
        let types = dir.join("types.json");
        let propositions = dir.join("propositions.json");
        let output = dir.join("out.json");

        fs::write(
            &members,
            r#"[{
                "declaring_type": "net.Connection",
                "name": "send",
                "parameters": [{"name": "message", "type": "java.lang.String"}],
                "return_type": "void",
                "tags": [{"kind": "throws", "exception": "java.lang.NullPointerException",
                          "comment": "if message is null"}]
            }]"#,
        )
        .unwrap();
        fs::write(&types, r#"[{"name": "net.Connection"}]"#).unwrap();
        fs::write(
            &propositions,
            r#"{"propositions": {"if message is null": [
                {"subject": {"text": "message"}, "predicate": "is null"}
            ]}}"#,
        )
        .unwrap();

        let args = TranslateArgs {
            members,
            types,
            propositions,
            config: None,
            output: Some(output.clone()),
        };
        let summary = translate(&args).unwrap();
        assert_eq!(summary.translated, 1);

        let translated = load_members(&output).unwrap();
        assert_eq!(translated[0].tags[0].condition(), Some("(args[0]==null)"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_input_fails() {
        let args = TranslateArgs {
            members: PathBuf::from("/nonexistent/members.json"),
            types: PathBuf::from("/nonexistent/types.json"),
            propositions: PathBuf::from("/nonexistent/propositions.json"),
            config: None,
            output: None,
        };
        assert!(translate(&args).is_err());
        assert_eq!(handle_translate(&args, OutputFormat::Human), 1);
    }
}
