use std::path::Path;

use id3::frame::Content;
use id3::{ErrorKind, Frame, Tag, TagLike, Version};

use crate::error::TagError;

/// ID3v1 extended genre code for "Podcast"
const PODCAST_GENRE: &str = "186";

/// Normalize the tags on a downloaded audio file.
///
/// Best effort by contract: callers log any error and keep the download. The
/// rules are: tag version becomes ID3v2.4 (created fresh when the file has
/// none); album gets the show title; title gets the episode title; artist
/// gets the feed author only when currently empty, a feed-embedded artist is
/// preserved; album artist always gets the feed author; the track number is
/// cleared; genre becomes the Podcast genre code.
pub fn munge(
    path: &Path,
    show_title: &str,
    episode_title: &str,
    feed_author: &str,
) -> Result<(), TagError> {
    if !is_id3_container(path) {
        return Err(TagError::UnsupportedContainer {
            path: path.to_path_buf(),
        });
    }

    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
        Err(e) => {
            return Err(TagError::LoadFailed {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    tag.set_album(show_title);
    tag.set_title(episode_title);
    if tag.artist().is_none_or(str::is_empty) {
        tag.set_artist(feed_author);
    }
    tag.set_album_artist(feed_author);
    tag.remove_track();
    tag.set_genre(PODCAST_GENRE);

    if tag.write_to_path(path, Version::Id3v24).is_ok() {
        return Ok(());
    }

    // Retry once with every text frame squeezed into Latin-1; unencodable
    // characters are dropped
    let fallback = latin1_tag(&tag);
    fallback
        .write_to_path(path, Version::Id3v24)
        .map_err(|e| TagError::SaveFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Containers the id3 crate can carry a tag in
fn is_id3_container(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            matches!(ext.to_lowercase().as_str(), "mp3" | "wav" | "aiff" | "aif")
        })
}

fn latin1_tag(tag: &Tag) -> Tag {
    let mut out = Tag::new();
    for frame in tag.frames() {
        match frame.content() {
            Content::Text(text) => {
                out.add_frame(Frame::text(frame.id(), latin1_lossy(text)));
            }
            _ => {
                out.add_frame(frame.clone());
            }
        }
    }
    out
}

/// Drop every character outside the Latin-1 range
fn latin1_lossy(text: &str) -> String {
    text.chars().filter(|c| (*c as u32) <= 0xFF).collect()
}
