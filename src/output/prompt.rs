//! Line-based selection prompt
//!
//! Rows are numbered from 1. An answer is a list of tokens separated by
//! spaces or commas:
//! - `3` picks the latest option of row 3, or its compatible one if there is
//!   no latest
//! - `3c` / `3l` pick the compatible / latest option, `3k` keeps the current range
//! - `*c` / `*l` apply to every row offering that option
//! - an empty line submits nothing, `q` cancels

use crate::domain::{Selection, SuggestionOption, SuggestionSet};
use crate::error::{AppError, PromptError};
use async_trait::async_trait;
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::sync::LazyLock;
use tokio::sync::oneshot;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(\d+|\*)([clk]?)$").unwrap());

const PROMPT: &str = "Upgrade which rows? (e.g. 1 2c 3l, *l for all, empty to skip, q to quit): ";

/// What the user submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Submit(Selection),
    Cancel,
}

/// Asks the user to choose among the offered suggestion sets
#[async_trait]
pub trait SelectionPrompt: Send {
    async fn select(&mut self, sets: &[SuggestionSet]) -> Result<PromptAnswer, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    Preferred,
    Compatible,
    Latest,
    Keep,
}

impl Pick {
    fn option<'a>(&self, set: &'a SuggestionSet) -> Option<&'a SuggestionOption> {
        let offered = |option: &'a SuggestionOption| option.value.is_some().then_some(option);
        match self {
            Pick::Preferred => offered(set.latest()).or_else(|| offered(set.compatible())),
            Pick::Compatible => offered(set.compatible()),
            Pick::Latest => offered(set.latest()),
            Pick::Keep => Some(set.current()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Pick::Preferred => "upgrade",
            Pick::Compatible => "compatible",
            Pick::Latest => "latest",
            Pick::Keep => "current",
        }
    }
}

/// Parse one answer line against the offered rows
pub fn parse_selection(input: &str, sets: &[SuggestionSet]) -> Result<PromptAnswer, PromptError> {
    let tokens: Vec<&str> = input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect();

    if tokens
        .iter()
        .any(|t| t.eq_ignore_ascii_case("q") || t.eq_ignore_ascii_case("quit"))
    {
        return Ok(PromptAnswer::Cancel);
    }

    let mut selection = Selection::new();
    for token in tokens {
        let caps = TOKEN_RE
            .captures(token)
            .ok_or_else(|| PromptError::InvalidToken {
                token: token.to_string(),
            })?;

        let pick = match caps[2].to_ascii_lowercase().as_str() {
            "c" => Pick::Compatible,
            "l" => Pick::Latest,
            "k" => Pick::Keep,
            _ => Pick::Preferred,
        };

        if &caps[1] == "*" {
            for set in sets {
                if let Some(option) = pick.option(set) {
                    selection.choose(set.candidate.id.clone(), option.value.clone());
                }
            }
            continue;
        }

        let row: usize = caps[1].parse().map_err(|_| PromptError::InvalidToken {
            token: token.to_string(),
        })?;
        let set = row
            .checked_sub(1)
            .and_then(|i| sets.get(i))
            .ok_or(PromptError::RowOutOfRange {
                row,
                rows: sets.len(),
            })?;
        let option = pick.option(set).ok_or(PromptError::OptionUnavailable {
            row,
            option: pick.name(),
        })?;
        selection.choose(set.candidate.id.clone(), option.value.clone());
    }

    Ok(PromptAnswer::Submit(selection))
}

/// Ask until a valid answer is read; end of input cancels
pub fn prompt_selection<R: BufRead, W: Write>(
    sets: &[SuggestionSet],
    mut reader: R,
    writer: &mut W,
) -> io::Result<PromptAnswer> {
    loop {
        write!(writer, "{}", PROMPT)?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            writeln!(writer)?;
            return Ok(PromptAnswer::Cancel);
        }

        match parse_selection(&line, sets) {
            Ok(answer) => return Ok(answer),
            Err(e) => writeln!(writer, "  {}", e)?,
        }
    }
}

/// Prompt reading stdin on a dedicated thread so cancellation never waits on it
#[derive(Debug, Default)]
pub struct TerminalPrompt;

#[async_trait]
impl SelectionPrompt for TerminalPrompt {
    async fn select(&mut self, sets: &[SuggestionSet]) -> Result<PromptAnswer, AppError> {
        let sets = sets.to_vec();
        let (tx, rx) = oneshot::channel();
        std::thread::spawn(move || {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let _ = tx.send(prompt_selection(&sets, stdin.lock(), &mut stdout));
        });

        match rx.await {
            Ok(answer) => Ok(answer?),
            Err(_) => Ok(PromptAnswer::Cancel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CandidateId, DependencyCandidate, DependencyKind, WorkspaceIdent};

    fn set(name: &str, current: &str, compatible: Option<&str>, latest: Option<&str>) -> SuggestionSet {
        let option = |value: Option<&str>| match value {
            Some(v) => SuggestionOption::upgrade(v, v),
            None => SuggestionOption::empty(),
        };
        SuggestionSet::new(
            DependencyCandidate::new(
                name,
                current,
                WorkspaceIdent::new("root"),
                DependencyKind::Dependencies,
            ),
            [
                SuggestionOption::current(current),
                option(compatible),
                option(latest),
            ],
        )
    }

    fn sets() -> Vec<SuggestionSet> {
        vec![
            set("lodash", "^4.17.0", Some("^4.17.21"), None),
            set("react", "^18.2.0", Some("^18.3.1"), Some("^19.0.0")),
            set("vite", "^4.0.0", None, Some("^5.4.0")),
        ]
    }

    fn submitted(input: &str) -> Selection {
        match parse_selection(input, &sets()).unwrap() {
            PromptAnswer::Submit(selection) => selection,
            PromptAnswer::Cancel => panic!("unexpected cancel"),
        }
    }

    #[test]
    fn test_empty_line_selects_nothing() {
        assert!(submitted("").is_empty());
        assert!(submitted("   \n").is_empty());
    }

    #[test]
    fn test_quit_cancels() {
        assert_eq!(parse_selection("q", &sets()), Ok(PromptAnswer::Cancel));
        assert_eq!(parse_selection("1 QUIT", &sets()), Ok(PromptAnswer::Cancel));
    }

    #[test]
    fn test_row_tokens() {
        let selection = submitted("1, 2c 3L");
        assert_eq!(
            selection.chosen_range(&CandidateId::new("lodash", "^4.17.0")),
            Some("^4.17.21")
        );
        assert_eq!(
            selection.chosen_range(&CandidateId::new("react", "^18.2.0")),
            Some("^18.3.1")
        );
        assert_eq!(
            selection.chosen_range(&CandidateId::new("vite", "^4.0.0")),
            Some("^5.4.0")
        );
    }

    #[test]
    fn test_later_tokens_override_and_keep() {
        let selection = submitted("2l 2k");
        assert_eq!(selection.chosen_range(&CandidateId::new("react", "^18.2.0")), None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_star_applies_where_offered() {
        let selection = submitted("*l");
        assert_eq!(selection.change_count(), 2);
        assert_eq!(selection.chosen_range(&CandidateId::new("lodash", "^4.17.0")), None);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_selection("4", &sets()),
            Err(PromptError::RowOutOfRange { row: 4, rows: 3 })
        );
        assert_eq!(
            parse_selection("0", &sets()),
            Err(PromptError::RowOutOfRange { row: 0, rows: 3 })
        );
        assert_eq!(
            parse_selection("1l", &sets()),
            Err(PromptError::OptionUnavailable {
                row: 1,
                option: "latest"
            })
        );
        assert_eq!(
            parse_selection("react", &sets()),
            Err(PromptError::InvalidToken {
                token: "react".to_string()
            })
        );
    }

    #[test]
    fn test_prompt_asks_again_after_error() {
        let input = b"9\n2l\n" as &[u8];
        let mut output = Vec::new();

        let answer = prompt_selection(&sets(), input, &mut output).unwrap();

        let selection = match answer {
            PromptAnswer::Submit(selection) => selection,
            PromptAnswer::Cancel => panic!("unexpected cancel"),
        };
        assert_eq!(selection.change_count(), 1);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("there is no row 9"));
        assert_eq!(output.matches("Upgrade which rows?").count(), 2);
    }

    #[test]
    fn test_prompt_end_of_input_cancels() {
        let mut output = Vec::new();
        let answer = prompt_selection(&sets(), b"" as &[u8], &mut output).unwrap();
        assert_eq!(answer, PromptAnswer::Cancel);
    }
}
