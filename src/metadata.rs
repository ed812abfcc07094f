use std::path::Path;

use crate::error::MetadataError;
use crate::feed::Episode;

/// Render the human-readable sidecar text for an episode.
///
/// One field per line: title, episode number, guid, publication date, link,
/// enclosure URL, then the content (falling back to the description) and the
/// description, both with HTML entities decoded.
pub fn render_episode_text(episode: &Episode) -> String {
    let date = episode
        .published_at
        .map(|dt| dt.to_rfc2822())
        .unwrap_or_default();

    let body = if episode.content_html.is_empty() {
        &episode.description
    } else {
        &episode.content_html
    };

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n{}\n{}\n",
        episode.title,
        episode.episode_number,
        episode.guid,
        date,
        episode.link,
        episode.enclosure_url,
        html_escape::decode_html_entities(body),
        html_escape::decode_html_entities(&episode.description),
    )
}

/// Write the sidecar metadata file next to a downloaded episode
pub fn write_episode_sidecar(episode: &Episode, path: &Path) -> Result<(), MetadataError> {
    std::fs::write(path, render_episode_text(episode)).map_err(|e| MetadataError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use tempfile::tempdir;

    fn make_episode() -> Episode {
        Episode {
            guid: "ep-guid".to_string(),
            title: "Episode 1".to_string(),
            link: "https://example.com/ep1".to_string(),
            description: "A &amp; B".to_string(),
            content_html: "<p>Long form</p>".to_string(),
            episode_number: "1".to_string(),
            enclosure_url: "https://example.com/ep1.mp3".to_string(),
            published_at: DateTime::parse_from_rfc2822("Mon, 15 Jan 2024 12:00:00 +0000").ok(),
        }
    }

    #[test]
    fn render_includes_all_fields() {
        let text = render_episode_text(&make_episode());

        assert!(text.starts_with("Episode 1\n1\nep-guid\n"));
        assert!(text.contains("https://example.com/ep1\n"));
        assert!(text.contains("https://example.com/ep1.mp3\n"));
        assert!(text.contains("<p>Long form</p>"));
    }

    #[test]
    fn render_decodes_html_entities() {
        let text = render_episode_text(&make_episode());
        assert!(text.contains("A & B"));
    }

    #[test]
    fn render_falls_back_to_description() {
        let episode = Episode {
            content_html: String::new(),
            ..make_episode()
        };

        let text = render_episode_text(&episode);
        assert_eq!(text.matches("A & B").count(), 2);
    }

    #[test]
    fn missing_fields_render_as_blank_lines() {
        let text = render_episode_text(&Episode::default());
        assert_eq!(text, "\n\n\n\n\n\n\n\n");
    }

    #[test]
    fn sidecar_is_written_to_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Episode 1.mp3.txt");

        write_episode_sidecar(&make_episode(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Episode 1"));
    }
}
