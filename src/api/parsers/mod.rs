mod matches;
mod pagination;
mod players;
mod profile;
mod tournaments;

use std::str::FromStr;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::errors::ParseError;

/// Field extraction for the directory's listing, results and profile pages.
///
/// Compiled once and shared by every fetch; each method takes a raw page
/// body and returns owned data.
pub struct HtmlExtractor {
    record_id: Regex,
    match_player_id: Regex,
    offset_param: Regex,
    table: Selector,
    list_item: Selector,
    cell: Selector,
    span_strong: Selector,
    strong: Selector,
    clickable: Selector,
    gap: Selector,
    step_link: Selector,
}

impl HtmlExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            record_id: compile(r"/(\d+)\?")?,
            match_player_id: compile(r"\?uai=(\d+)&")?,
            offset_param: compile(r"offset=(\d+)")?,
            table: selector("table")?,
            list_item: selector("tr.list-item")?,
            cell: selector("td")?,
            span_strong: selector("span strong")?,
            strong: selector("strong")?,
            clickable: selector("td.clickable")?,
            gap: selector("span.gap")?,
            step_link: selector("a.step")?,
        })
    }

    /// Numeric id from a row's `onclick="location.href = '/path/<id>?...';"`
    fn onclick_id(&self, element: ElementRef, field: &'static str) -> Result<i64, ParseError> {
        let onclick = element
            .value()
            .attr("onclick")
            .ok_or(ParseError::MissingElement(field))?;
        let href = retrieve_href(onclick);

        self.record_id
            .captures(&href)
            .and_then(|c| c.get(1))
            .ok_or_else(|| ParseError::InvalidField {
                field,
                value: href.clone(),
            })
            .and_then(|id| parse_number(id.as_str(), field))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile regex {}", pattern))
}

fn selector(css: &'static str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|e| ParseError::Selector {
        css,
        reason: format!("{:?}", e),
    })
}

fn retrieve_href(onclick: &str) -> String {
    onclick
        .replace("location.href = '", "")
        .replace("';", "")
        .trim()
        .to_string()
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_number<T: FromStr>(text: &str, field: &'static str) -> Result<T, ParseError> {
    text.trim().parse().map_err(|_| ParseError::InvalidField {
        field,
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_is_extracted_from_onclick() {
        assert_eq!(
            retrieve_href("location.href = '/userAccount/up/123?x=1';"),
            "/userAccount/up/123?x=1"
        );
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(parse_number::<i32>(" 1512\n", "rating"), Ok(1512));
        assert!(parse_number::<i32>("", "rating").is_err());
    }
}
