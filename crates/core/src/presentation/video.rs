//! YouTube embed and thumbnail URLs for a trailer key.

const EMBED_PARAMS: &str = "autoplay=1&rel=0&modestbranding=1&showinfo=0&controls=1&enablejsapi=1";

/// Autoplaying embed URL for the player overlay.
pub fn embed_url(key: &str) -> String {
    format!(
        "https://www.youtube.com/embed/{}?{}",
        urlencoding::encode(key),
        EMBED_PARAMS
    )
}

pub fn thumbnail_url(key: &str) -> String {
    format!(
        "https://img.youtube.com/vi/{}/maxresdefault.jpg",
        urlencoding::encode(key)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url("YoHD9XEInc0"),
            "https://www.youtube.com/embed/YoHD9XEInc0?autoplay=1&rel=0&modestbranding=1&showinfo=0&controls=1&enablejsapi=1"
        );
    }

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("YoHD9XEInc0"),
            "https://img.youtube.com/vi/YoHD9XEInc0/maxresdefault.jpg"
        );
    }
}
