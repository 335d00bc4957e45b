use scraper::{ElementRef, Html};

use super::{HtmlExtractor, text_of};
use crate::errors::ParseError;

impl HtmlExtractor {
    /// External membership id from a profile page.
    ///
    /// The id sits in the first `<small>` after the profile title, as
    /// `"<label>: <id>"`.
    pub fn external_id(&self, body: &str) -> Result<String, ParseError> {
        let html = Html::parse_document(body);
        let mut elements = html.root_element().descendants().filter_map(ElementRef::wrap);

        elements
            .by_ref()
            .find(is_profile_title)
            .ok_or(ParseError::MissingElement("profile title"))?;
        let small = elements
            .find(|e| e.value().name() == "small")
            .ok_or(ParseError::MissingElement("profile id line"))?;

        let line = text_of(small);
        match line.split_once(": ") {
            Some((_, id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => Err(ParseError::InvalidField {
                field: "profile id line",
                value: line,
            }),
        }
    }
}

fn is_profile_title(element: &ElementRef) -> bool {
    element.value().name() == "span"
        && element
            .value()
            .classes()
            .any(|class| class == "title" || class == "less-margin")
}
