use std::sync::Arc;

/// Why an episode was skipped without downloading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Destination path is present in the retire list
    Retired,
    /// Destination file already exists on disk
    AlreadyDownloaded,
}

/// Events emitted during a sync run for progress reporting
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The OPML catalog has been parsed
    CatalogLoaded { show_count: usize },

    /// Processing of a show has started
    ShowStarted { show_title: String },

    /// A show's feed could not be fetched or parsed; the show yields zero
    /// episodes and the run continues
    FeedUnavailable { show_title: String, error: String },

    /// The retire list could not be read; the run continues with an empty set
    RetireListUnreadable { error: String },

    /// A show could not be processed (e.g. its directory could not be
    /// created); the run continues with the next show
    ShowFailed { show_title: String, error: String },

    /// An episode was skipped without downloading
    EpisodeSkipped {
        episode_title: String,
        reason: SkipReason,
    },

    /// A download is starting
    DownloadStarting {
        episode_title: String,
        /// Expected content length in bytes, if advertised
        content_length: Option<u64>,
    },

    /// Download progress update
    DownloadProgress {
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    /// A download completed and was committed to its final name
    DownloadCompleted {
        episode_title: String,
        bytes_downloaded: u64,
    },

    /// Bytes written differ from the advertised content length; the file is
    /// kept and the episode still counts as downloaded
    SizeMismatch {
        episode_title: String,
        expected: u64,
        actual: u64,
    },

    /// A download failed; the run continues with the next episode
    DownloadFailed { episode_title: String, error: String },

    /// Tag normalization could not be applied; the download itself succeeded
    TagFailed { episode_title: String, error: String },

    /// The sidecar metadata file could not be written
    SidecarFailed { episode_title: String, error: String },

    /// Processing of a show has finished
    ShowCompleted {
        show_title: String,
        downloaded: usize,
    },

    /// The whole run has finished (also emitted after an interrupt)
    SyncCompleted {
        total_downloaded: usize,
        interrupted: bool,
    },
}

/// Trait for reporting progress events during a sync run.
///
/// Implementations can use this to display progress bars, log messages,
/// or collect statistics.
pub trait ProgressReporter: Send + Sync {
    /// Report a progress event
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// A no-op progress reporter that silently ignores all events.
/// Useful for tests or quiet mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {
        // Intentionally empty
    }
}

impl NoopReporter {
    /// Create a new NoopReporter wrapped in an Arc
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}
