use scraper::{ElementRef, Html};

use super::HtmlExtractor;

impl HtmlExtractor {
    /// Offset of the last results page according to the pager.
    ///
    /// Long pagers elide pages behind a `span.gap`, and the link right
    /// after it points at the last page. Short pagers list every page,
    /// so the last `a.step` is the last page.
    pub fn last_page_offset(&self, html: &Html) -> Option<usize> {
        self.offset_after_gap(html)
            .or_else(|| self.offset_of_last_step(html))
    }

    fn offset_after_gap(&self, html: &Html) -> Option<usize> {
        let gap = html.select(&self.gap).next()?;
        let link = gap.next_siblings().find_map(ElementRef::wrap)?;
        self.offset_of(link)
    }

    fn offset_of_last_step(&self, html: &Html) -> Option<usize> {
        let link = html.select(&self.step_link).last()?;
        self.offset_of(link)
    }

    fn offset_of(&self, link: ElementRef) -> Option<usize> {
        let href = link.value().attr("href")?;
        let captures = self.offset_param.captures(href)?;
        captures.get(1)?.as_str().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(inner: &str) -> Html {
        Html::parse_document(&format!(r#"<div class="pagination">{inner}</div>"#))
    }

    #[test]
    fn link_after_gap_wins() {
        let extractor = HtmlExtractor::new().unwrap();
        let html = pager(
            r#"<span class="currentStep">1</span>
            <a class="step" href="/t/tr/9?offset=100&max=100">2</a>
            <span class="step gap">..</span>
            <a class="step" href="/t/tr/9?offset=1400&max=100">15</a>
            <a class="nextLink" href="/t/tr/9?offset=100&max=100">Next</a>"#,
        );
        assert_eq!(extractor.last_page_offset(&html), Some(1400));
    }

    #[test]
    fn last_step_link_without_gap() {
        let extractor = HtmlExtractor::new().unwrap();
        let html = pager(
            r#"<span class="currentStep">1</span>
            <a class="step" href="/t/tr/9?offset=100&max=100">2</a>
            <a class="step" href="/t/tr/9?offset=200&max=100">3</a>
            <a class="nextLink" href="/t/tr/9?offset=100&max=100">Next</a>"#,
        );
        assert_eq!(extractor.last_page_offset(&html), Some(200));
    }

    #[test]
    fn no_pager_means_single_page() {
        let extractor = HtmlExtractor::new().unwrap();
        assert_eq!(extractor.last_page_offset(&pager("")), None);
    }
}
