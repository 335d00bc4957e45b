use scraper::{ElementRef, Html};

use super::{HtmlExtractor, parse_number, text_of};
use crate::domain::models::PlayerRow;
use crate::errors::ParseError;

const LOCATION_CELL: usize = 5;
const RATING_CELL: usize = 6;

impl HtmlExtractor {
    /// Total player count from the listing header, 0 when absent
    pub fn player_total(&self, body: &str) -> Result<usize, ParseError> {
        let html = Html::parse_document(body);
        match html.select(&self.span_strong).next() {
            Some(strong) => parse_number(&text_of(strong), "player total"),
            None => Ok(0),
        }
    }

    /// Every row of the listing's results table
    pub fn player_rows(&self, body: &str) -> Result<Vec<PlayerRow>, ParseError> {
        let html = Html::parse_document(body);
        let table = html
            .select(&self.table)
            .nth(1)
            .ok_or(ParseError::MissingElement("player results table"))?;

        table
            .select(&self.list_item)
            .map(|row| self.player_row(row))
            .collect()
    }

    /// First result row of an id search, `None` when the search found nothing
    pub fn first_player_row(&self, body: &str) -> Result<Option<PlayerRow>, ParseError> {
        let html = Html::parse_document(body);
        let Some(table) = html.select(&self.table).nth(1) else {
            return Ok(None);
        };

        table
            .select(&self.list_item)
            .next()
            .map(|row| self.player_row(row))
            .transpose()
    }

    fn player_row(&self, row: ElementRef) -> Result<PlayerRow, ParseError> {
        let id = self.onclick_id(row, "player link")?;
        let cells: Vec<ElementRef> = row.select(&self.cell).collect();

        let location = cells
            .get(LOCATION_CELL)
            .ok_or(ParseError::MissingElement("player location cell"))?;
        let rating = cells
            .get(RATING_CELL)
            .ok_or(ParseError::MissingElement("player rating cell"))?;

        Ok(PlayerRow {
            id,
            raw_location: text_of(*location),
            rating: parse_number(&text_of(*rating), "player rating")?,
        })
    }
}
