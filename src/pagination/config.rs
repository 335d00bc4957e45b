/// Configuration for paginated requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub page_size_cap: usize,
}

impl PaginationConfig {
    pub fn new(page_size_cap: usize) -> Self {
        Self { page_size_cap }
    }

    /// Requested size, capped, and never larger than the known total
    pub fn page_size(&self, requested: usize, total: Option<usize>) -> usize {
        let capped = requested.min(self.page_size_cap);
        let sized = total.map_or(capped, |t| capped.min(t));
        sized.max(1)
    }
}
