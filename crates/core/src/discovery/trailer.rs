use crate::catalog::VideoRecord;

pub const TRAILER_SITE: &str = "YouTube";
pub const TRAILER_KIND: &str = "Trailer";

/// First YouTube trailer in source order. `None` is a normal outcome.
pub fn select_trailer(videos: &[VideoRecord]) -> Option<&VideoRecord> {
    videos
        .iter()
        .find(|v| v.site == TRAILER_SITE && v.kind == TRAILER_KIND)
}
