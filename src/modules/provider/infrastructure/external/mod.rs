pub mod jikan;

pub use jikan::JikanMetadataService;
