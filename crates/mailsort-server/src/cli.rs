//! `mailsort classify`: batch classification over stdin.

use std::path::PathBuf;

use anyhow::{bail, Context};
use mailsort_classify::{classify_messages, Strategy};
use mailsort_core::{Error, MailsortConfig, StrategyKind};

use crate::protocol::{parse_messages, render_table};
use crate::state::{load_taxonomy, AppState};

/// Arguments after `mailsort classify`.
#[derive(Debug, Default, PartialEq)]
pub struct ClassifyArgs {
    /// Overrides `MAILSORT_STRATEGY` when given.
    pub strategy: Option<StrategyKind>,
    /// Overrides `MAILSORT_TAXONOMY` when given.
    pub taxonomy: Option<PathBuf>,
    pub table: bool,
}

impl ClassifyArgs {
    pub fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut parsed = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--table" => parsed.table = true,
                "--taxonomy" => {
                    let path = iter.next().context("--taxonomy needs a file path")?;
                    parsed.taxonomy = Some(PathBuf::from(path));
                }
                other if other.starts_with("--") => bail!("Unknown option: {}", other),
                other => {
                    if parsed.strategy.is_some() {
                        bail!("Unexpected argument: {}", other);
                    }
                    parsed.strategy = Some(other.parse()?);
                }
            }
        }
        Ok(parsed)
    }
}

/// Classify the messages in `input` and render the output text.
pub fn run_classify(
    args: &ClassifyArgs,
    mut config: MailsortConfig,
    input: &str,
) -> anyhow::Result<String> {
    let messages = parse_messages(input).context("Failed to parse messages")?;
    if let Some(path) = &args.taxonomy {
        config.taxonomy_file = Some(path.clone());
    }
    let strategy = args.strategy.unwrap_or(config.strategy);

    let labels = match strategy {
        StrategyKind::Rules => classify_messages(&messages, Strategy::Rule)?,
        StrategyKind::Similarity if messages.is_empty() => {
            // No model load for an empty batch, but the taxonomy must still be usable.
            if load_taxonomy(&config)?.is_empty() {
                return Err(Error::EmptyCategorySet.into());
            }
            Vec::new()
        }
        StrategyKind::Similarity => {
            let state = AppState::new(config)?;
            let strategy = Strategy::Similarity {
                classifier: &state.classifier,
                taxonomy: &state.taxonomy,
            };
            classify_messages(&messages, strategy)?
        }
    };

    if args.table {
        Ok(render_table(&messages, &labels))
    } else {
        Ok(format!("{}\n", serde_json::to_string(&labels)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailsort_core::EmbedderKind;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn hashing_config() -> MailsortConfig {
        let mut config = MailsortConfig::new("data");
        config.embedder = EmbedderKind::Hashing;
        config
    }

    #[test]
    fn test_parse_args() {
        let parsed = ClassifyArgs::parse(&args(&["rules", "--table"])).unwrap();
        assert_eq!(parsed.strategy, Some(StrategyKind::Rules));
        assert!(parsed.table);

        let parsed = ClassifyArgs::parse(&args(&["--taxonomy", "cats.json"])).unwrap();
        assert_eq!(parsed.taxonomy, Some(PathBuf::from("cats.json")));
        assert_eq!(parsed.strategy, None);

        assert!(ClassifyArgs::parse(&args(&["--taxonomy"])).is_err());
        assert!(ClassifyArgs::parse(&args(&["bogus"])).is_err());
        assert!(ClassifyArgs::parse(&args(&["rules", "similarity"])).is_err());
        assert!(ClassifyArgs::parse(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_rules_output() {
        let parsed = ClassifyArgs::parse(&args(&["rules"])).unwrap();
        let input = r#"[{"from": "bob@acmecorp.com"}, {"from": "friend@gmail.com", "subject": "Let's catch up"}]"#;
        let out = run_classify(&parsed, hashing_config(), input).unwrap();
        assert_eq!(out, "[\"Work\",\"Primary\"]\n");
    }

    #[test]
    fn test_empty_input_prints_empty_array() {
        let out = run_classify(&ClassifyArgs::default(), hashing_config(), "").unwrap();
        assert_eq!(out, "[]\n");
    }

    #[test]
    fn test_similarity_with_taxonomy_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"label": "Bills", "descriptor": "invoice payment due"}},
                {{"label": "Family", "descriptor": "mom dad family dinner"}}]"#
        )
        .unwrap();

        let parsed = ClassifyArgs {
            strategy: Some(StrategyKind::Similarity),
            taxonomy: Some(file.path().to_path_buf()),
            table: false,
        };
        let input = "{\"subject\": \"Family dinner on Sunday\"}\n{\"subject\": \"Invoice payment due\"}\n";
        let out = run_classify(&parsed, hashing_config(), input).unwrap();
        assert_eq!(out, "[\"Family\",\"Bills\"]\n");
    }

    #[test]
    fn test_table_output() {
        let parsed = ClassifyArgs::parse(&args(&["rules", "--table"])).unwrap();
        let input = r#"[{"from": "bob@acmecorp.com", "subject": "Q3 planning"}]"#;
        let out = run_classify(&parsed, hashing_config(), input).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Category"));
        assert!(lines[1].contains("Work") && lines[1].contains("Q3 planning"));
    }

    #[test]
    fn test_empty_taxonomy_fails_even_without_messages() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let parsed = ClassifyArgs {
            strategy: Some(StrategyKind::Similarity),
            taxonomy: Some(file.path().to_path_buf()),
            table: false,
        };
        let err = run_classify(&parsed, hashing_config(), "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::EmptyCategorySet)
        ));

        // Rules never consult the taxonomy.
        let rules = ClassifyArgs {
            strategy: Some(StrategyKind::Rules),
            ..parsed
        };
        assert_eq!(run_classify(&rules, hashing_config(), "").unwrap(), "[]\n");
    }

    #[test]
    fn test_missing_taxonomy_file_fails() {
        let parsed = ClassifyArgs {
            strategy: Some(StrategyKind::Similarity),
            taxonomy: Some(PathBuf::from("/nonexistent/taxonomy.json")),
            table: false,
        };
        assert!(run_classify(&parsed, hashing_config(), "[{\"subject\": \"hi\"}]").is_err());
    }
}
