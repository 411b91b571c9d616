//! MIME type detection for embedded media.

use std::path::Path;

/// MIME type constants for the media notes can embed.
pub mod types {
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";
    pub const OGG_VIDEO: &str = "video/ogg";
    pub const MOV: &str = "video/quicktime";
}

/// Video MIME type for a path, or `None` when it is not a video file.
///
/// Extension matching is case-insensitive (`clip.MP4` is a video).
pub fn video_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => Some(types::MP4),
        "webm" => Some(types::WEBM),
        "ogg" | "ogv" => Some(types::OGG_VIDEO),
        "mov" => Some(types::MOV),
        _ => None,
    }
}

/// Check if the path is a video file.
#[inline]
pub fn is_video(path: &Path) -> bool {
    video_type(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_type() {
        assert_eq!(video_type(Path::new("a/clip.mp4")), Some(types::MP4));
        assert_eq!(video_type(Path::new("clip.WEBM")), Some(types::WEBM));
        assert_eq!(video_type(Path::new("clip.ogg")), Some(types::OGG_VIDEO));
        assert_eq!(video_type(Path::new("clip.mov")), Some(types::MOV));
        assert_eq!(video_type(Path::new("photo.png")), None);
        assert_eq!(video_type(Path::new("README")), None);
    }

    #[test]
    fn test_is_video() {
        assert!(is_video(Path::new("x.mp4")));
        assert!(!is_video(Path::new("x.md")));
    }
}
