pub mod data_import;
pub mod library;
pub mod provider;
