use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use podsync::{
    NoopReporter, ProgressEvent, ProgressReporter, ReqwestClient, RetireOutcome, RetireStore,
    RunContext, SharedProgressReporter, SkipReason, SyncOptions, sync_catalog,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "[-] ");

/// Download podcast episodes from an OPML subscription list
#[derive(Parser, Debug)]
#[command(name = "podsync")]
#[command(about = "Download podcast episodes from an OPML subscription list")]
#[command(version)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["opml", "retire", "retire_safe"])
))]
struct Args {
    /// Path to the OPML subscription list to process
    #[arg(short = 'i', long, value_name = "PATH")]
    opml: Option<PathBuf>,

    /// Retire this episode file and delete it from disk
    #[arg(long, value_name = "PATH")]
    retire: Option<PathBuf>,

    /// Retire this episode file without deleting it
    #[arg(long = "retire-safe", value_name = "PATH")]
    retire_safe: Option<PathBuf>,

    /// Location to save podcasts
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Use a flat directory structure instead of per-show subdirectories
    #[arg(long)]
    flat: bool,

    /// Download at most the last n episodes of each feed
    #[arg(short = 'n', long = "number-of-episodes", value_name = "N")]
    number_of_episodes: Option<usize>,

    /// Write a .txt metadata file for each downloaded episode
    #[arg(long)]
    metadata: bool,

    /// Override the retire list location
    #[arg(long = "retire-filename", value_name = "PATH", default_value = podsync::DEFAULT_RETIRE_FILENAME)]
    retire_filename: PathBuf,

    /// Open the output directory after a run that downloaded something
    #[arg(long = "open-if-new")]
    open_if_new: bool,

    /// Skip tag normalization (diagnostic)
    #[arg(long = "do-not-munge")]
    do_not_munge: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    multi: MultiProgress,
    main_bar: ProgressBar,
    /// Bar for the one in-flight download (execution is sequential)
    download_bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            main_bar,
            download_bar: Mutex::new(None),
        }
    }

    fn start_download_bar(&self, length: Option<u64>, title: &str) {
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let bar = self.multi.add(ProgressBar::new(length.unwrap_or(0)));
        bar.set_style(style);
        bar.set_message(truncate_title(title, 40));

        *self.download_bar.lock().unwrap() = Some(bar);
    }

    fn finish_download_bar(&self) {
        if let Some(bar) = self.download_bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::CatalogLoaded { show_count } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Catalog loaded: {} shows",
                    show_count.to_string().cyan()
                ));
            }

            ProgressEvent::ShowStarted { show_title } => {
                self.main_bar
                    .set_message(format!("{HEADPHONES}{}", show_title.bold().green()));
            }

            ProgressEvent::FeedUnavailable { show_title, error } => {
                self.println(format!(
                    "{WARNING}{} - feed unavailable: {}",
                    show_title.yellow(),
                    error.dimmed()
                ));
            }

            ProgressEvent::ShowFailed { show_title, error } => {
                self.println(format!(
                    "{FAILURE}{} - {}",
                    show_title.red(),
                    error.dimmed()
                ));
            }

            ProgressEvent::RetireListUnreadable { error } => {
                self.println(format!(
                    "{WARNING}Retire list unreadable, treating as empty: {}",
                    error.dimmed()
                ));
            }

            ProgressEvent::EpisodeSkipped {
                episode_title,
                reason,
            } => {
                let why = match reason {
                    SkipReason::Retired => "retired",
                    SkipReason::AlreadyDownloaded => "already downloaded",
                };
                self.println(format!(
                    "{SKIP}{} ({})",
                    truncate_title(&episode_title, 50).dimmed(),
                    why.dimmed()
                ));
            }

            ProgressEvent::DownloadStarting {
                episode_title,
                content_length,
            } => {
                self.start_download_bar(content_length, &episode_title);
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
            } => {
                if let Some(bar) = self.download_bar.lock().unwrap().as_ref() {
                    if let Some(total) = total_bytes {
                        bar.set_length(total);
                    }
                    bar.set_position(bytes_downloaded);
                }
            }

            ProgressEvent::DownloadCompleted { episode_title, .. } => {
                self.finish_download_bar();
                self.println(format!(
                    "{SUCCESS}{}",
                    truncate_title(&episode_title, 50).green()
                ));
            }

            ProgressEvent::SizeMismatch {
                episode_title,
                expected,
                actual,
            } => {
                self.println(format!(
                    "{WARNING}{} - incomplete download? got {} of {} bytes, keeping file",
                    truncate_title(&episode_title, 40).yellow(),
                    actual,
                    expected
                ));
            }

            ProgressEvent::DownloadFailed {
                episode_title,
                error,
            } => {
                self.finish_download_bar();
                self.println(format!(
                    "{FAILURE}{} - {}",
                    truncate_title(&episode_title, 40).red(),
                    error.red()
                ));
            }

            ProgressEvent::TagFailed {
                episode_title,
                error,
            } => {
                self.println(format!(
                    "{WARNING}{} - tags left as-is: {}",
                    truncate_title(&episode_title, 40).yellow(),
                    error.dimmed()
                ));
            }

            ProgressEvent::SidecarFailed {
                episode_title,
                error,
            } => {
                self.println(format!(
                    "{WARNING}{} - metadata file not written: {}",
                    truncate_title(&episode_title, 40).yellow(),
                    error.dimmed()
                ));
            }

            ProgressEvent::ShowCompleted {
                show_title,
                downloaded,
            } => {
                if downloaded > 0 {
                    self.println(format!(
                        "{HEADPHONES}{}: {} new",
                        show_title.bold(),
                        downloaded.to_string().green()
                    ));
                }
            }

            ProgressEvent::SyncCompleted {
                total_downloaded,
                interrupted,
            } => {
                self.main_bar.finish_and_clear();
                let suffix = if interrupted {
                    " (interrupted)".red().to_string()
                } else {
                    String::new()
                };
                println!(
                    "\n{PARTY}{} episodes downloaded{}",
                    total_downloaded.to_string().green().bold(),
                    suffix
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Add a path to the retire list, optionally deleting the file
fn run_retire(path: &PathBuf, retire_file: &PathBuf, delete: bool) -> Result<()> {
    let mut store = match RetireStore::load(retire_file) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "{WARNING}{}",
                format!("Retire list unreadable, starting fresh: {e}").yellow()
            );
            RetireStore::empty(retire_file)
        }
    };

    let path_str = path.to_string_lossy();
    let outcome = store
        .retire(&path_str, delete)
        .context("Failed to retire episode")?;

    match outcome {
        RetireOutcome::Added if delete => {
            println!("{SUCCESS}Retired and deleted {}", path_str.cyan());
        }
        RetireOutcome::Added => {
            println!("{SUCCESS}Retired {}", path_str.cyan());
        }
        RetireOutcome::AlreadyRetired => {
            println!("{SKIP}{} is already retired", path_str.cyan());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.retire {
        return run_retire(path, &args.retire_filename, true);
    }
    if let Some(path) = &args.retire_safe {
        return run_retire(path, &args.retire_filename, false);
    }

    let opml = args.opml.as_ref().expect("clap enforces the mode group");

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "podsync".bold().magenta(),
            "- OPML Podcast Downloader".dimmed()
        );
    }

    let client = ReqwestClient::new();

    let options = SyncOptions {
        output_dir: args.output_dir.clone(),
        flat: args.flat,
        episode_limit: args.number_of_episodes,
        write_sidecar: args.metadata,
        munge_tags: !args.do_not_munge,
        retire_file: args.retire_filename.clone(),
    };

    let reporter: SharedProgressReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let ctx = Arc::new(RunContext::new());

    // Single global interrupt handler: request cooperative cancellation; the
    // engine removes the in-flight temp file and the summary still prints
    let signal_ctx = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nStopping...");
            signal_ctx.cancel();
        }
    });

    let summary = sync_catalog(&client, opml, &options, &ctx, &reporter)
        .await
        .context("Failed to sync catalog")?;

    if summary.interrupted {
        // The download guard normally cleans this up already
        if let Some(temp) = ctx.current_temp() {
            let _ = std::fs::remove_file(temp);
        }
        std::process::exit(1);
    }

    if args.open_if_new
        && summary.downloaded > 0
        && let Err(e) = open::that(&args.output_dir)
    {
        eprintln!(
            "{WARNING}{}",
            format!("Could not open {}: {e}", args.output_dir.display()).yellow()
        );
    }

    Ok(())
}
