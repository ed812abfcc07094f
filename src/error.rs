use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading the OPML subscription list
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read OPML file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed OPML document {path}: {source}")]
    MalformedCatalog {
        path: PathBuf,
        #[source]
        source: quick_xml::DeError,
    },
}

/// Errors that can occur when fetching or parsing a show's feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for feed {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),
}

/// Errors that can occur during episode downloads
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to rename {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Download cancelled")]
    Cancelled,
}

/// Errors that can occur while normalizing audio tags
#[derive(Error, Debug)]
pub enum TagError {
    #[error("No taggable container in {path}")]
    UnsupportedContainer { path: PathBuf },

    #[error("Failed to load tag from {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("Failed to save tag to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },
}

/// Errors that can occur while maintaining the retire list
#[derive(Error, Debug)]
pub enum RetireError {
    #[error("Failed to read retire list {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write retire list {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete retired file {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when writing the sidecar metadata file
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to write metadata file {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level errors for sync operations
///
/// Per-show and per-episode failures are reported through progress events and
/// never surface here; only catalog-level problems abort a run.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
