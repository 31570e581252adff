//! Media filename rules shared by every integration surface.

use std::path::Path;

/// Video extensions the relays pick up, lowercase without dots.
pub const VIDEO_EXTS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "wmv", "flv"];

/// Marker embedded in filenames the relays produce. Files carrying it are
/// never picked up again, which keeps output folders from feeding back in.
pub const OUTPUT_MARKER: &str = "-mosaic-output";

/// Check if a filename has one of the recognized video extensions.
pub fn is_video_filename(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTS.iter().any(|v| *v == ext)
        })
        .unwrap_or(false)
}

/// Check if a filename is something a relay wrote.
pub fn is_relay_output(name: &str) -> bool {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name);
    stem.to_ascii_lowercase().contains(OUTPUT_MARKER)
}

/// Guess a content type from the filename, defaulting to `video/mp4`.
pub fn guess_content_type(name: &str) -> &'static str {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("video/mp4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extension_matching() {
        assert!(is_video_filename("clip.mp4"));
        assert!(is_video_filename("Clip.MOV"));
        assert!(is_video_filename("a/b/long take.mkv"));
        assert!(!is_video_filename("notes.txt"));
        assert!(!is_video_filename("archive.mp4.gz"));
        assert!(!is_video_filename("noext"));
    }

    #[test]
    fn test_relay_output_detection() {
        assert!(is_relay_output("talk-mosaic-output.mp4"));
        assert!(is_relay_output("talk-MOSAIC-OUTPUT_2.mp4"));
        assert!(is_relay_output("demo-mosaic-output_3.mov"));
        assert!(!is_relay_output("talk.mp4"));
        assert!(!is_relay_output("mosaic.mp4"));
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(guess_content_type("clip.mp4"), "video/mp4");
        assert_eq!(guess_content_type("clip.webm"), "video/webm");
        assert_eq!(guess_content_type("clip.unknownext"), "video/mp4");
    }
}
