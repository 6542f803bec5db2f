use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};

use super::{AnalyticsBackend, AnalyticsError};
use crate::catalog::MovieSummary;
use crate::discovery::TrendingEntry;
use crate::presentation::PosterUrls;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS search_counts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        search_term TEXT NOT NULL UNIQUE,
        count INTEGER NOT NULL DEFAULT 1,
        movie_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        poster_url TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_search_counts_count ON search_counts(count);
"#;

/// SQLite-backed search counts.
pub struct SqliteAnalytics {
    conn: Mutex<Connection>,
    posters: PosterUrls,
}

impl SqliteAnalytics {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path, posters: PosterUrls) -> Result<Self, AnalyticsError> {
        let conn = Connection::open(path).map_err(|e| AnalyticsError::Database(e.to_string()))?;
        Self::with_connection(conn, posters)
    }

    /// Create an in-memory store (useful for testing)
    pub fn in_memory(posters: PosterUrls) -> Result<Self, AnalyticsError> {
        let conn =
            Connection::open_in_memory().map_err(|e| AnalyticsError::Database(e.to_string()))?;
        Self::with_connection(conn, posters)
    }

    fn with_connection(conn: Connection, posters: PosterUrls) -> Result<Self, AnalyticsError> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AnalyticsError::Database(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            posters,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AnalyticsError> {
        self.conn
            .lock()
            .map_err(|_| AnalyticsError::Database("connection lock poisoned".to_string()))
    }

    /// Current count for a term (0 when never searched).
    pub fn count_for(&self, term: &str) -> Result<i64, AnalyticsError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT COALESCE((SELECT count FROM search_counts WHERE search_term = ?), 0)",
            params![term.trim()],
            |row| row.get(0),
        )
        .map_err(|e| AnalyticsError::Database(e.to_string()))
    }
}

#[async_trait]
impl AnalyticsBackend for SqliteAnalytics {
    async fn record_search(
        &self,
        term: &str,
        top_result: &MovieSummary,
    ) -> Result<(), AnalyticsError> {
        let poster_url = self.posters.url_for(top_result.poster_path.as_deref());
        let conn = self.lock()?;

        // Existing terms only get their count bumped; the first top result sticks.
        conn.execute(
            r#"
            INSERT INTO search_counts (search_term, count, movie_id, title, poster_url, updated_at)
            VALUES (?, 1, ?, ?, ?, ?)
            ON CONFLICT(search_term) DO UPDATE SET
                count = count + 1,
                updated_at = excluded.updated_at
            "#,
            params![
                term.trim(),
                top_result.id as i64,
                top_result.title,
                poster_url,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| AnalyticsError::Database(e.to_string()))?;

        Ok(())
    }

    async fn trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, AnalyticsError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(
                r#"
                SELECT id, title, poster_url, movie_id
                FROM search_counts
                ORDER BY count DESC, updated_at DESC
                LIMIT ?
                "#,
            )
            .map_err(|e| AnalyticsError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let id: i64 = row.get(0)?;
                let movie_id: i64 = row.get(3)?;
                Ok(TrendingEntry {
                    id: id.to_string(),
                    title: row.get(1)?,
                    poster_url: row.get(2)?,
                    movie_id: Some(movie_id as u64),
                })
            })
            .map_err(|e| AnalyticsError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| AnalyticsError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::PLACEHOLDER_POSTER;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    fn store() -> SqliteAnalytics {
        SqliteAnalytics::in_memory(PosterUrls::new("https://img.test/w500")).unwrap()
    }

    #[tokio::test]
    async fn test_record_creates_then_increments() {
        let store = store();
        let inception = fixtures::movie_summary(27205, "Inception");

        store.record_search("inception", &inception).await.unwrap();
        store.record_search("inception", &inception).await.unwrap();

        assert_eq!(store.count_for("inception").unwrap(), 2);
        assert_eq!(store.count_for("matrix").unwrap(), 0);
    }

    #[tokio::test]
    async fn test_first_top_result_sticks() {
        let store = store();
        store
            .record_search("batman", &fixtures::movie_summary(268, "Batman"))
            .await
            .unwrap();
        store
            .record_search("batman", &fixtures::movie_summary(414906, "The Batman"))
            .await
            .unwrap();

        let trending = store.trending(5).await.unwrap();
        assert_eq!(trending.len(), 1);
        assert_eq!(trending[0].movie_id, Some(268));
        assert_eq!(trending[0].title, "Batman");
    }

    #[tokio::test]
    async fn test_trending_ordered_by_count() {
        let store = store();
        let a = fixtures::movie_summary(1, "Alpha");
        let b = fixtures::movie_summary(2, "Beta");
        let c = fixtures::movie_summary(3, "Gamma");

        store.record_search("alpha", &a).await.unwrap();
        for _ in 0..3 {
            store.record_search("beta", &b).await.unwrap();
        }
        for _ in 0..2 {
            store.record_search("gamma", &c).await.unwrap();
        }

        let trending = store.trending(2).await.unwrap();
        let titles: Vec<&str> = trending.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Beta", "Gamma"]);
        assert!(trending.iter().all(|e| e.movie_id.is_some()));
    }

    #[tokio::test]
    async fn test_poster_url_placeholder() {
        let store = store();
        let mut movie = fixtures::movie_summary(5, "No Poster");
        movie.poster_path = None;

        store.record_search("no poster", &movie).await.unwrap();

        let trending = store.trending(5).await.unwrap();
        assert_eq!(trending[0].poster_url, PLACEHOLDER_POSTER);
    }

    #[tokio::test]
    async fn test_persists_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("analytics.db");
        let posters = PosterUrls::new("https://img.test/w500");

        {
            let store = SqliteAnalytics::new(&path, posters.clone()).unwrap();
            store
                .record_search("dune", &fixtures::movie_summary(438631, "Dune"))
                .await
                .unwrap();
        }

        let reopened = SqliteAnalytics::new(&path, posters).unwrap();
        assert_eq!(reopened.count_for("dune").unwrap(), 1);
    }
}
