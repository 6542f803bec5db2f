//! "Where to watch" links.
//!
//! These are provider search pages keyed on the title, not availability
//! lookups; nothing here calls a provider.

use serde::{Deserialize, Serialize};

/// Grouping shown in the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchCategory {
    Streaming,
    RentOrBuy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchProvider {
    Netflix,
    Disney,
    Prime,
    Hbo,
    Amazon,
    GooglePlay,
}

impl WatchProvider {
    /// Display order: streaming first, then rent or buy.
    pub const ALL: [WatchProvider; 6] = [
        WatchProvider::Netflix,
        WatchProvider::Disney,
        WatchProvider::Prime,
        WatchProvider::Hbo,
        WatchProvider::Amazon,
        WatchProvider::GooglePlay,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WatchProvider::Netflix => "Netflix",
            WatchProvider::Disney => "Disney+",
            WatchProvider::Prime => "Prime Video",
            WatchProvider::Hbo => "HBO Max",
            WatchProvider::Amazon => "Amazon",
            WatchProvider::GooglePlay => "Google Play",
        }
    }

    pub fn logo_url(&self) -> &'static str {
        match self {
            WatchProvider::Netflix => {
                "https://upload.wikimedia.org/wikipedia/commons/0/08/Netflix_2015_logo.svg"
            }
            WatchProvider::Disney => {
                "https://upload.wikimedia.org/wikipedia/commons/3/3e/Disney%2B_logo.svg"
            }
            WatchProvider::Prime => {
                "https://upload.wikimedia.org/wikipedia/commons/f/f1/Prime_Video.png"
            }
            WatchProvider::Hbo => {
                "https://upload.wikimedia.org/wikipedia/commons/1/17/HBO_Max_Logo.svg"
            }
            WatchProvider::Amazon => {
                "https://upload.wikimedia.org/wikipedia/commons/a/a9/Amazon_logo.svg"
            }
            WatchProvider::GooglePlay => {
                "https://upload.wikimedia.org/wikipedia/commons/7/78/Google_Play_Store_badge_EN.svg"
            }
        }
    }

    pub fn category(&self) -> WatchCategory {
        match self {
            WatchProvider::Amazon | WatchProvider::GooglePlay => WatchCategory::RentOrBuy,
            _ => WatchCategory::Streaming,
        }
    }

    /// Provider search page for `title`.
    pub fn search_url(&self, title: &str) -> String {
        match self {
            WatchProvider::Netflix => {
                format!("https://www.netflix.com/search?q={}", urlencoding::encode(title))
            }
            WatchProvider::Disney => format!(
                "https://www.disneyplus.com/search?q={}",
                urlencoding::encode(title)
            ),
            WatchProvider::Prime => format!(
                "https://www.amazon.com/s?k={}",
                urlencoding::encode(&format!("{} movie", title))
            ),
            WatchProvider::Hbo => format!(
                "https://play.hbomax.com/search?q={}",
                urlencoding::encode(title)
            ),
            WatchProvider::Amazon => format!(
                "https://www.amazon.com/s?k={}",
                urlencoding::encode(&format!("{} movie rent", title))
            ),
            WatchProvider::GooglePlay => format!(
                "https://play.google.com/store/search?q={}",
                urlencoding::encode(&format!("{} movie", title))
            ),
        }
    }
}

/// A rendered provider link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchLink {
    pub provider: WatchProvider,
    pub name: String,
    pub logo_url: String,
    pub category: WatchCategory,
    pub url: String,
}

/// Links for every provider, in display order.
pub fn watch_links(title: &str) -> Vec<WatchLink> {
    WatchProvider::ALL
        .iter()
        .map(|provider| WatchLink {
            provider: *provider,
            name: provider.name().to_string(),
            logo_url: provider.logo_url().to_string(),
            category: provider.category(),
            url: provider.search_url(title),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_urls_escape_title() {
        assert_eq!(
            WatchProvider::Netflix.search_url("The Dark Knight"),
            "https://www.netflix.com/search?q=The%20Dark%20Knight"
        );
        assert_eq!(
            WatchProvider::Hbo.search_url("Fast & Furious"),
            "https://play.hbomax.com/search?q=Fast%20%26%20Furious"
        );
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(
            WatchProvider::Prime.search_url("Dune"),
            "https://www.amazon.com/s?k=Dune%20movie"
        );
        assert_eq!(
            WatchProvider::Amazon.search_url("Dune"),
            "https://www.amazon.com/s?k=Dune%20movie%20rent"
        );
        assert_eq!(
            WatchProvider::GooglePlay.search_url("Dune"),
            "https://play.google.com/store/search?q=Dune%20movie"
        );
    }

    #[test]
    fn test_watch_links_grouping() {
        let links = watch_links("Dune");
        assert_eq!(links.len(), 6);

        let streaming: Vec<&str> = links
            .iter()
            .filter(|l| l.category == WatchCategory::Streaming)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(streaming, vec!["Netflix", "Disney+", "Prime Video", "HBO Max"]);

        let rent: Vec<&str> = links
            .iter()
            .filter(|l| l.category == WatchCategory::RentOrBuy)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(rent, vec!["Amazon", "Google Play"]);
    }

    #[test]
    fn test_provider_serialization() {
        let json = serde_json::to_string(&WatchProvider::GooglePlay).unwrap();
        assert_eq!(json, "\"google_play\"");
    }
}
