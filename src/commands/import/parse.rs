use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::error::ImportError;

pub(crate) const MAX_TITLE_CHARS: usize = 200;
pub(crate) const UNTITLED_PROCESS: &str = "Processo sem título";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDocument {
    pub(crate) case_number: String,
    pub(crate) title: String,
    pub(crate) events: Vec<(String, String)>,
}

/// One way of reading dated movement lines out of a document.
#[derive(Debug)]
struct EventStrategy {
    name: &'static str,
    line: Regex,
}

impl EventStrategy {
    fn new(name: &'static str, pattern: &str) -> Result<Self> {
        let line = Regex::new(pattern)
            .with_context(|| format!("failed to compile {name} event regex"))?;
        Ok(Self { name, line })
    }

    /// Returns `None` when the strategy finds nothing, so the next one can run.
    fn collect(&self, text: &str) -> Option<Vec<(String, String)>> {
        let events: Vec<(String, String)> = self
            .line
            .captures_iter(text)
            .filter_map(|captures| {
                let date = captures.name("date")?.as_str().to_string();
                let description = captures
                    .name("description")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();
                Some((date, description))
            })
            .collect();

        (!events.is_empty()).then_some(events)
    }
}

#[derive(Debug)]
pub(crate) struct DocumentParser {
    case_number: Regex,
    event_strategies: Vec<EventStrategy>,
}

impl DocumentParser {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            case_number: Regex::new(r"\b\d{7}-\d{2}\.\d{4}\.\d\.\d{2}\.\d{4}\b")
                .context("failed to compile case number regex")?,
            // Order matters: the first strategy with any match wins outright.
            event_strategies: vec![
                EventStrategy::new(
                    "dated_dash",
                    r"(?m)^(?P<date>\d{2}/\d{2}/\d{4})[^\S\r\n]+-[^\S\r\n]+(?P<description>.+)$",
                )?,
                EventStrategy::new(
                    "dated_bare",
                    r"(?m)^(?P<date>\d{2}/\d{2}/\d{4})[^\S\r\n]+(?P<description>.*)$",
                )?,
            ],
        })
    }

    pub(crate) fn parse(&self, file_name: &str, text: &str) -> Result<ParsedDocument, ImportError> {
        let case_number = self
            .case_number(text)
            .ok_or_else(|| ImportError::CaseNumberNotFound {
                file_name: file_name.to_string(),
            })?;

        Ok(ParsedDocument {
            case_number: case_number.to_string(),
            title: derive_title(text),
            events: self.events(text),
        })
    }

    pub(crate) fn case_number<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.case_number.find(text).map(|m| m.as_str())
    }

    pub(crate) fn events(&self, text: &str) -> Vec<(String, String)> {
        self.event_strategies
            .iter()
            .find_map(|strategy| {
                let events = strategy.collect(text)?;
                debug!(strategy = strategy.name, count = events.len(), "matched events");
                Some(events)
            })
            .unwrap_or_default()
    }
}

pub(crate) fn derive_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(MAX_TITLE_CHARS).collect())
        .unwrap_or_else(|| UNTITLED_PROCESS.to_string())
}
