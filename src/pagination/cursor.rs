/// Parameters of one page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub max: usize,
    pub offset: usize,
}

/// Offset cursor over a paginated result set.
///
/// The offset only moves forward. A bounded cursor stops once the offset
/// reaches the bound; a discovering cursor allows a single page until the
/// bound is learned from that page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCursor {
    offset: usize,
    page_size: usize,
    bound: Option<usize>,
    pages_fetched: usize,
}

impl OffsetCursor {
    pub fn bounded(start: usize, page_size: usize, bound: usize) -> Self {
        Self {
            offset: start,
            page_size: page_size.max(1),
            bound: Some(bound),
            pages_fetched: 0,
        }
    }

    pub fn discovering(page_size: usize) -> Self {
        Self {
            offset: 0,
            page_size: page_size.max(1),
            bound: None,
            pages_fetched: 0,
        }
    }

    /// Next page to fetch, or `None` once the pass is over
    pub fn next_request(&self) -> Option<PageRequest> {
        let more = match self.bound {
            Some(bound) => self.offset < bound,
            None => self.pages_fetched == 0,
        };
        more.then_some(PageRequest {
            max: self.page_size,
            offset: self.offset,
        })
    }

    pub fn advance(&mut self) {
        self.offset += self.page_size;
        self.pages_fetched += 1;
    }

    pub fn discover_bound(&mut self, bound: usize) {
        self.bound = Some(bound);
    }

    pub fn has_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}
