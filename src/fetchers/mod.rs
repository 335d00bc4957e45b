mod paginated;

pub use paginated::{Page, PaginatedFetcher};
