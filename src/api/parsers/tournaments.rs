use scraper::Html;

use super::{HtmlExtractor, parse_number, text_of};
use crate::domain::models::TournamentId;
use crate::errors::ParseError;

impl HtmlExtractor {
    /// Total tournament count shown on the search page
    pub fn tournament_total(&self, body: &str) -> Result<usize, ParseError> {
        let html = Html::parse_document(body);
        let strong = html
            .select(&self.strong)
            .next()
            .ok_or(ParseError::MissingElement("tournament total"))?;
        parse_number(&text_of(strong), "tournament total")
    }

    pub fn tournament_ids(&self, body: &str) -> Result<Vec<TournamentId>, ParseError> {
        let html = Html::parse_document(body);
        let table = html
            .select(&self.table)
            .next()
            .ok_or(ParseError::MissingElement("tournament table"))?;

        table
            .select(&self.list_item)
            .map(|row| self.onclick_id(row, "tournament link"))
            .collect()
    }
}
