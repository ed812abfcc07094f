use std::path::{Path, PathBuf};

use crate::catalog::Show;
use crate::feed::Episode;

/// Make a string safe to use as a file or directory name.
///
/// Deterministic: the same input always yields the same output.
pub fn sanitize(name: &str) -> String {
    sanitize_filename::sanitize(name)
}

/// Extract the audio file extension from an enclosure URL.
///
/// Takes the final path segment's suffix after the last `.`, with any query
/// string stripped. Empty when the URL has no extension (or is empty).
pub fn extension_from_url(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or("");
    let segment = without_query.rsplit('/').next().unwrap_or("");

    match segment.rsplit_once('.') {
        Some((_, ext)) => ext.to_string(),
        None => String::new(),
    }
}

/// File name for a downloaded episode: sanitized title plus the extension
/// taken from the enclosure URL
pub fn episode_file_name(episode: &Episode) -> String {
    format!(
        "{}.{}",
        sanitize(&episode.title),
        extension_from_url(&episode.enclosure_url)
    )
}

/// Destination path for an episode.
///
/// Nested layout puts each show in its own subdirectory; flat layout keeps
/// everything in the output root with the show name prefixed to the file
/// name.
pub fn destination_path(output_dir: &Path, show: &Show, episode: &Episode, flat: bool) -> PathBuf {
    let file_name = episode_file_name(episode);

    if flat {
        output_dir.join(format!("{} - {}", show.dir_name(), file_name))
    } else {
        output_dir.join(show.dir_name()).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_episode(title: &str, url: &str) -> Episode {
        Episode {
            title: title.to_string(),
            enclosure_url: url.to_string(),
            ..Episode::default()
        }
    }

    fn make_show(title: &str) -> Show {
        Show {
            title: title.to_string(),
            feed_url: Some("http://x/feed.xml".to_string()),
        }
    }

    #[test]
    fn sanitize_is_deterministic() {
        let input = "Ep. 1: The \"Start\" <of/it\\all>?";
        assert_eq!(sanitize(input), sanitize(input));
    }

    #[test]
    fn sanitize_strips_filesystem_illegal_characters() {
        let out = sanitize("a/b\\c:d*e?f\"g<h>i|j");
        for c in ['/', '\\', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!out.contains(c), "sanitized output contains {c:?}");
        }
    }

    #[test]
    fn sanitize_keeps_plain_titles() {
        assert_eq!(sanitize("Test Show"), "Test Show");
    }

    #[test]
    fn extension_from_simple_url() {
        assert_eq!(extension_from_url("http://x/ep.mp3"), "mp3");
    }

    #[test]
    fn extension_strips_query_string() {
        assert_eq!(extension_from_url("http://x/ep.mp3?token=a.b"), "mp3");
    }

    #[test]
    fn extension_uses_final_path_segment() {
        assert_eq!(extension_from_url("http://x.example.com/feed/ep.m4a"), "m4a");
    }

    #[test]
    fn extension_empty_when_segment_has_no_dot() {
        assert_eq!(extension_from_url("http://x/episode"), "");
    }

    #[test]
    fn extension_empty_for_empty_url() {
        assert_eq!(extension_from_url(""), "");
    }

    #[test]
    fn file_name_combines_title_and_extension() {
        let episode = make_episode("My Episode", "http://x/audio.mp3");
        assert_eq!(episode_file_name(&episode), "My Episode.mp3");
    }

    #[test]
    fn nested_destination_uses_show_subdirectory() {
        let show = make_show("Test Show");
        let episode = make_episode("Ep 1", "http://x/ep1.mp3");

        let dest = destination_path(Path::new("output"), &show, &episode, false);
        assert_eq!(dest, Path::new("output/Test Show/Ep 1.mp3"));
    }

    #[test]
    fn flat_destination_prefixes_show_name() {
        let show = make_show("Test Show");
        let episode = make_episode("Ep 1", "http://x/ep1.mp3");

        let dest = destination_path(Path::new("output"), &show, &episode, true);
        assert_eq!(dest, Path::new("output/Test Show - Ep 1.mp3"));
    }
}
