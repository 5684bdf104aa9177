pub mod library_status;
pub mod media_kind;

pub use library_status::LibraryStatus;
pub use media_kind::MediaKind;
