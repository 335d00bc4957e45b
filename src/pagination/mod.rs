mod config;
mod cursor;
pub mod urls;

pub use config::PaginationConfig;
pub use cursor::{OffsetCursor, PageRequest};
pub use urls::build_paginated_url_with_params;
