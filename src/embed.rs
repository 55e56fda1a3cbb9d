//! Rewrites of external media links into URLs that can be put in an
//! `<iframe>`/`<img>` directly. Links that are not recognised come back unchanged.
//!
//! Matching is on path fragments anywhere in the string, so scheme-less links
//! and any `*.youtube.com` or `*.google.com` host are recognised.

use once_cell::sync::Lazy;
use regex::Regex;

const YOUTUBE_EMBED: &str = "https://www.youtube-nocookie.com/embed/";
const YOUTUBE_ID_LEN: usize = 11;

static YOUTU_BE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"youtu\.be/([A-Za-z0-9_-]+)").expect("youtu.be regex should compile"));
static WATCH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]v=([A-Za-z0-9_-]+)").expect("watch regex should compile"));
static SHORTS_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"shorts/([A-Za-z0-9_-]+)").expect("shorts regex should compile"));
static DRIVE_FILE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"file/d/([A-Za-z0-9_-]+)").expect("drive regex should compile"));

/// Embeddable form of a video link (YouTube or Google Drive).
pub fn video_embed_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if raw.contains("youtube.com/embed/") || raw.contains("youtube-nocookie.com/embed/") {
        return raw.to_string();
    }
    if let Some(id) = youtube_id(raw) {
        return format!("{YOUTUBE_EMBED}{id}");
    }
    if let Some(id) = drive_file_id(raw) {
        return format!("https://drive.google.com/file/d/{id}/preview");
    }
    raw.to_string()
}

/// Embeddable form of an image link (Google Drive thumbnails).
pub fn image_embed_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match drive_file_id(raw) {
        Some(id) => format!("https://drive.google.com/thumbnail?id={id}"),
        None => raw.to_string(),
    }
}

fn youtube_id(raw: &str) -> Option<&str> {
    let pattern: &Regex = if raw.contains("youtu.be/") {
        &*YOUTU_BE_ID
    } else if raw.contains("youtube.com/watch") {
        &*WATCH_ID
    } else if raw.contains("youtube.com/shorts/") {
        &*SHORTS_ID
    } else {
        return None;
    };
    let id = first_capture(pattern, raw)?;
    // ids are 11 characters; anything glued on after that is dropped
    Some(id.get(..YOUTUBE_ID_LEN).unwrap_or(id))
}

fn drive_file_id(raw: &str) -> Option<&str> {
    first_capture(&*DRIVE_FILE_ID, raw)
}

fn first_capture<'a>(pattern: &Regex, raw: &'a str) -> Option<&'a str> {
    pattern.captures(raw).and_then(|c| c.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_variants() {
        let expected = "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ";
        assert_eq!(video_embed_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"), expected);
        assert_eq!(video_embed_url("https://youtu.be/dQw4w9WgXcQ?si=abc"), expected);
        assert_eq!(video_embed_url("https://youtube.com/shorts/dQw4w9WgXcQ"), expected);
        assert_eq!(video_embed_url("https://m.youtube.com/watch?v=dQw4w9WgXcQextra"), expected);
        assert_eq!(video_embed_url("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), expected);
    }

    #[test]
    fn youtube_on_other_hosts_and_without_scheme() {
        let expected = "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ";
        assert_eq!(video_embed_url("https://music.youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(video_embed_url("youtube.com/watch?v=dQw4w9WgXcQ"), expected);
        assert_eq!(video_embed_url("youtu.be/dQw4w9WgXcQ"), expected);
    }

    #[test]
    fn embed_links_pass_through() {
        let url = "https://www.youtube.com/embed/dQw4w9WgXcQ";
        assert_eq!(video_embed_url(url), url);
        // a watch link with no id is left as is
        assert_eq!(video_embed_url("https://www.youtube.com/watch"), "https://www.youtube.com/watch");
    }

    #[test]
    fn drive_links() {
        let link = "https://drive.google.com/file/d/1AbC-d_E/view?usp=sharing";
        assert_eq!(video_embed_url(link), "https://drive.google.com/file/d/1AbC-d_E/preview");
        assert_eq!(image_embed_url(link), "https://drive.google.com/thumbnail?id=1AbC-d_E");
    }

    #[test]
    fn drive_links_without_scheme_or_on_docs_host() {
        assert_eq!(image_embed_url("drive.google.com/file/d/1AbC/view"), "https://drive.google.com/thumbnail?id=1AbC");
        assert_eq!(
            video_embed_url("https://docs.google.com/file/d/1AbC/edit"),
            "https://drive.google.com/file/d/1AbC/preview"
        );
    }

    #[test]
    fn unknown_and_empty() {
        assert_eq!(video_embed_url(""), "");
        assert_eq!(image_embed_url("not a url"), "not a url");
        assert_eq!(video_embed_url("https://vimeo.com/123"), "https://vimeo.com/123");
        assert_eq!(image_embed_url("https://example.org/a.jpg"), "https://example.org/a.jpg");
    }
}
