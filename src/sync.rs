// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::catalog::parse_catalog;
use crate::episode::{TempFileGuard, destination_path, download, temp_path};
use crate::error::{DownloadError, SyncError};
use crate::feed::fetch_feed;
use crate::http::HttpClient;
use crate::metadata::write_episode_sidecar;
use crate::progress::{ProgressEvent, SharedProgressReporter, SkipReason};
use crate::retire::{DEFAULT_RETIRE_FILENAME, RetireStore};
use crate::tag;

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Root directory for downloads
    pub output_dir: PathBuf,
    /// Keep all files in the output root instead of per-show subdirectories
    pub flat: bool,
    /// Cap on episodes considered per show (None = all)
    pub episode_limit: Option<usize>,
    /// Write a sidecar text file per downloaded episode
    pub write_sidecar: bool,
    /// Normalize audio tags after each download
    pub munge_tags: bool,
    /// Location of the retire list
    pub retire_file: PathBuf,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            flat: false,
            episode_limit: None,
            write_sidecar: false,
            munge_tags: true,
            retire_file: PathBuf::from(DEFAULT_RETIRE_FILENAME),
        }
    }
}

/// Result of a sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Number of episodes downloaded across all shows
    pub downloaded: usize,
    /// Whether the run was cut short by a cancellation request
    pub interrupted: bool,
}

/// Run-wide mutable state shared between the engine and the interrupt path.
///
/// Execution is sequential, so the atomics are not there for contention;
/// they give the ctrl-c listener a race-free view of the running total and
/// the one in-flight temp file. The temp path is set before each download
/// begins and cleared immediately after the commit rename.
#[derive(Debug, Default)]
pub struct RunContext {
    downloaded: AtomicUsize,
    cancelled: AtomicBool,
    current_temp: Mutex<Option<PathBuf>>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cooperative cancellation; the engine stops between chunks
    /// and between episodes
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn total_downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    fn record_download(&self) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
    }

    fn set_current_temp(&self, path: PathBuf) {
        *self.current_temp.lock().unwrap() = Some(path);
    }

    fn clear_current_temp(&self) {
        *self.current_temp.lock().unwrap() = None;
    }

    /// Path of the temp file currently being written, if a download is in
    /// flight
    pub fn current_temp(&self) -> Option<PathBuf> {
        self.current_temp.lock().unwrap().clone()
    }
}

/// Synchronize every show in an OPML catalog to the output directory.
///
/// Per show: resolve the feed, take the most recent
/// `min(episode_limit, available)` entries and walk them with an index
/// counting down to 1, so the oldest entry of that window is processed first
/// and the newest last. Candidates already retired or already on disk are
/// skipped; entries without an enclosure have nothing to fetch. Everything
/// else is streamed to a `.part` file, committed by rename, tagged, and
/// counted.
///
/// Failures local to one show or one episode are reported as events and the
/// run continues; only a broken catalog aborts.
pub async fn sync_catalog<C: HttpClient>(
    client: &C,
    opml_path: &Path,
    options: &SyncOptions,
    ctx: &RunContext,
    reporter: &SharedProgressReporter,
) -> Result<SyncSummary, SyncError> {
    let shows = parse_catalog(opml_path)?;

    reporter.report(ProgressEvent::CatalogLoaded {
        show_count: shows.len(),
    });

    let retire = match RetireStore::load(&options.retire_file) {
        Ok(store) => store,
        Err(e) => {
            reporter.report(ProgressEvent::RetireListUnreadable {
                error: e.to_string(),
            });
            RetireStore::empty(&options.retire_file)
        }
    };

    'shows: for show in &shows {
        if ctx.is_cancelled() {
            break;
        }

        reporter.report(ProgressEvent::ShowStarted {
            show_title: show.title.clone(),
        });

        let Some(feed_url) = &show.feed_url else {
            reporter.report(ProgressEvent::FeedUnavailable {
                show_title: show.title.clone(),
                error: "no feed URL in catalog entry".to_string(),
            });
            continue;
        };

        let feed = match fetch_feed(client, feed_url).await {
            Ok(feed) => feed,
            Err(e) => {
                reporter.report(ProgressEvent::FeedUnavailable {
                    show_title: show.title.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        let show_dir = if options.flat {
            options.output_dir.clone()
        } else {
            options.output_dir.join(show.dir_name())
        };

        if let Err(e) = std::fs::create_dir_all(&show_dir) {
            reporter.report(ProgressEvent::ShowFailed {
                show_title: show.title.clone(),
                error: e.to_string(),
            });
            continue;
        }

        let available = feed.episodes.len();
        let to_consider = options.episode_limit.map_or(available, |n| n.min(available));

        let mut show_downloaded = 0usize;

        // The most recent `to_consider` entries, walked oldest-of-window
        // first. The countdown order decides which destination name is
        // claimed first when titles collide, so it stays as-is.
        for index in (1..=to_consider).rev() {
            if ctx.is_cancelled() {
                break 'shows;
            }

            let episode = &feed.episodes[index - 1];

            let dest = destination_path(&options.output_dir, show, episode, options.flat);
            let dest_str = dest.to_string_lossy().to_string();

            if retire.contains(&dest_str) {
                reporter.report(ProgressEvent::EpisodeSkipped {
                    episode_title: episode.title.clone(),
                    reason: SkipReason::Retired,
                });
                continue;
            }

            if dest.exists() {
                reporter.report(ProgressEvent::EpisodeSkipped {
                    episode_title: episode.title.clone(),
                    reason: SkipReason::AlreadyDownloaded,
                });
                continue;
            }

            if episode.enclosure_url.is_empty() {
                // Nothing to fetch
                continue;
            }

            let temp = temp_path(&dest);
            ctx.set_current_temp(temp.clone());
            let mut guard = TempFileGuard::new(temp.clone());

            let bytes = match download(
                client,
                &episode.enclosure_url,
                &temp,
                &episode.title,
                ctx,
                reporter,
            )
            .await
            {
                Ok(bytes) => bytes,
                Err(DownloadError::Cancelled) => {
                    drop(guard);
                    ctx.clear_current_temp();
                    break 'shows;
                }
                Err(e) => {
                    reporter.report(ProgressEvent::DownloadFailed {
                        episode_title: episode.title.clone(),
                        error: e.to_string(),
                    });
                    drop(guard);
                    ctx.clear_current_temp();
                    continue;
                }
            };

            // Sole commit point: a file at its final path is complete
            if let Err(e) = std::fs::rename(&temp, &dest) {
                let error = DownloadError::RenameFailed {
                    from: temp.clone(),
                    to: dest.clone(),
                    source: e,
                };
                reporter.report(ProgressEvent::DownloadFailed {
                    episode_title: episode.title.clone(),
                    error: error.to_string(),
                });
                ctx.clear_current_temp();
                continue;
            }

            guard.disarm();
            ctx.clear_current_temp();

            reporter.report(ProgressEvent::DownloadCompleted {
                episode_title: episode.title.clone(),
                bytes_downloaded: bytes,
            });

            if options.munge_tags
                && let Err(e) = tag::munge(&dest, &show.title, &episode.title, &feed.author)
            {
                reporter.report(ProgressEvent::TagFailed {
                    episode_title: episode.title.clone(),
                    error: e.to_string(),
                });
            }

            if options.write_sidecar {
                let sidecar = sidecar_path(&dest);
                if let Err(e) = write_episode_sidecar(episode, &sidecar) {
                    reporter.report(ProgressEvent::SidecarFailed {
                        episode_title: episode.title.clone(),
                        error: e.to_string(),
                    });
                }
            }

            show_downloaded += 1;
            ctx.record_download();
        }

        reporter.report(ProgressEvent::ShowCompleted {
            show_title: show.title.clone(),
            downloaded: show_downloaded,
        });
    }

    let summary = SyncSummary {
        downloaded: ctx.total_downloaded(),
        interrupted: ctx.is_cancelled(),
    };

    reporter.report(ProgressEvent::SyncCompleted {
        total_downloaded: summary.downloaded,
        interrupted: summary.interrupted,
    });

    Ok(summary)
}

/// Sidecar metadata path for a destination: the destination plus `.txt`
fn sidecar_path(dest: &Path) -> PathBuf {
    let mut os = dest.as_os_str().to_os_string();
    os.push(".txt");
    PathBuf::from(os)
}
