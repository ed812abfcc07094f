pub mod catalog;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod metadata;
pub mod progress;
pub mod retire;
pub mod sync;
pub mod tag;

// Re-export main types for convenience
pub use catalog::{Show, parse_catalog};
pub use episode::{destination_path, episode_file_name, extension_from_url, sanitize};
pub use error::{
    CatalogError, DownloadError, FeedError, MetadataError, RetireError, SyncError, TagError,
};
pub use feed::{Episode, Feed, fetch_feed, parse_feed};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use progress::{
    NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter, SkipReason,
};
pub use retire::{DEFAULT_RETIRE_FILENAME, RetireOutcome, RetireStore};
pub use sync::{RunContext, SyncOptions, SyncSummary, sync_catalog};
