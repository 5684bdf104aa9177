pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::LocalRecord;
pub use repositories::RecordStore;
pub use value_objects::{LibraryStatus, MediaKind};

#[cfg(test)]
pub use repositories::MockRecordStore;
