use scraper::{ElementRef, Html};

use super::{HtmlExtractor, retrieve_href};
use crate::domain::models::{MatchPage, MatchPairing, PlayerId};

impl HtmlExtractor {
    /// Winner/loser pairs of a results page plus its pager bound.
    ///
    /// Clickable cells come in (winner, loser) order. A pair with a cell
    /// that carries no player reference is counted and skipped.
    pub fn match_page(&self, body: &str) -> MatchPage {
        let html = Html::parse_document(body);
        let cells: Vec<ElementRef> = html.select(&self.clickable).collect();

        let mut page = MatchPage {
            last_offset: self.last_page_offset(&html),
            ..MatchPage::default()
        };

        for pair in cells.chunks_exact(2) {
            match (self.match_player(pair[0]), self.match_player(pair[1])) {
                (Some(winner_id), Some(loser_id)) => page.pairings.push(MatchPairing {
                    winner_id,
                    loser_id,
                }),
                _ => page.skipped_cells += 1,
            }
        }

        page
    }

    fn match_player(&self, cell: ElementRef) -> Option<PlayerId> {
        let href = retrieve_href(cell.value().attr("onclick")?);
        let captures = self.match_player_id.captures(&href)?;
        captures.get(1)?.as_str().parse().ok()
    }
}
