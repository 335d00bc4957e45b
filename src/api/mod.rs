mod directory_client;
pub mod parsers;

pub use directory_client::DirectoryClient;
pub use parsers::HtmlExtractor;
