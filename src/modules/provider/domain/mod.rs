pub mod metadata_service;

pub use metadata_service::{MediaMetadata, MetadataService};

#[cfg(test)]
pub use metadata_service::MockMetadataService;
