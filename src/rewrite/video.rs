//! Inline video player for video attachments.

/// `<video>` element replacing a markdown link to a video file.
///
/// Surrounded by blank lines so markdown renderers treat it as an HTML
/// block rather than inline HTML.
pub fn video_embed(url: &str, mime: &str) -> String {
    format!(
        "\n<video controls style=\"width:100%; max-height:480px;border:1px solid #ccc;border-radius:5px;\">\n    <source src=\"{url}\" type=\"{mime}\">\n</video>\n"
    )
}
