//! Postgres persistence for the `comics` table (see design §6). Both the
//! ingester (writer) and the searcher (reader) depend on this module; it is
//! intentionally hand-written SQL rather than an ORM query builder, matching
//! the original's direct use of `sqlx`/`pgx` over the JSONB `words` column.

use std::collections::HashSet;

use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::model::{Comic, ComicRef, UpdateStats};

/// Connects to Postgres and applies embedded migrations. Safe to call from
/// every process that touches the `comics` table; `CREATE TABLE IF NOT
/// EXISTS` makes this idempotent regardless of startup order.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

/// Upserts a comic keyed by id. Re-running on an unchanged comic is a no-op
/// for content (idempotent per design §4.1).
pub async fn upsert_comic(pool: &PgPool, comic: &Comic) -> Result<(), sqlx::Error> {
    let words = Value::from(comic.words.clone());
    sqlx::query(
        r#"
        INSERT INTO comics (id, url_adress, words, title, alt, transcript, safe_title)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            url_adress = EXCLUDED.url_adress,
            words = EXCLUDED.words,
            title = EXCLUDED.title,
            alt = EXCLUDED.alt,
            transcript = EXCLUDED.transcript,
            safe_title = EXCLUDED.safe_title
        "#,
    )
    .bind(comic.id)
    .bind(&comic.url)
    .bind(words)
    .bind(&comic.title)
    .bind(&comic.alt)
    .bind(&comic.transcript)
    .bind(&comic.safe_title)
    .execute(pool)
    .await?;
    Ok(())
}

/// All currently-stored ids, used to compute `toFetch = {1..latest} \ savedIds`.
pub async fn saved_ids(pool: &PgPool) -> Result<HashSet<i64>, sqlx::Error> {
    let rows = sqlx::query("SELECT id FROM comics").fetch_all(pool).await?;
    Ok(rows.into_iter().map(|r| r.get::<i32, _>("id") as i64).collect())
}

/// Drops every row. Not gated by run-state.
pub async fn drop_all(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("TRUNCATE TABLE comics").execute(pool).await?;
    Ok(())
}

/// Row counts and keyword aggregates for `Stats`. `comics_total` is left at
/// zero; callers fill it in from the remote corpus's `latest`.
pub async fn db_stats(pool: &PgPool) -> Result<UpdateStats, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS comics_fetched,
            COALESCE(SUM(jsonb_array_length(words)), 0) AS words_total,
            (SELECT COUNT(DISTINCT word) FROM comics, jsonb_array_elements_text(comics.words) AS word) AS words_unique
        FROM comics
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(UpdateStats {
        comics_fetched: row.get::<i64, _>("comics_fetched"),
        words_total: row.get::<i64, _>("words_total"),
        words_unique: row.get::<i64, _>("words_unique"),
        comics_total: 0,
    })
}

/// Every comic with its keyword set, used to build the in-memory inverted
/// index from scratch.
pub async fn scan_all(pool: &PgPool) -> Result<Vec<(i64, String, Vec<String>)>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, url_adress, words FROM comics")
        .fetch_all(pool)
        .await?;

    let mut comics = Vec::with_capacity(rows.len());
    for row in rows {
        let id: i32 = row.get("id");
        let url: String = row.get("url_adress");
        let words: Value = row.get("words");
        let words: Vec<String> = serde_json::from_value(words).unwrap_or_default();
        comics.push((id as i64, url, words));
    }
    Ok(comics)
}

/// The weaker, database-backed ranked search: rows whose `words` array
/// intersects `keywords`, ordered by intersection size descending, bounded
/// by `limit`. `total` is simply the number of returned rows (design §9,
/// open question: this cannot distinguish "exactly `limit` matches" from
/// "more than `limit` matches" — implemented as specified).
pub async fn search(
    pool: &PgPool,
    keywords: &[String],
    limit: i64,
) -> Result<(Vec<ComicRef>, i64), sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, url_adress
        FROM comics
        WHERE words ?| $1
        ORDER BY (
            SELECT COUNT(*)
            FROM jsonb_array_elements_text(words) AS w
            WHERE w = ANY($1)
        ) DESC
        LIMIT $2
        "#,
    )
    .bind(keywords)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let comics: Vec<ComicRef> = rows
        .into_iter()
        .map(|row| ComicRef {
            id: row.get::<i32, _>("id") as i64,
            url: row.get("url_adress"),
        })
        .collect();
    let total = comics.len() as i64;
    Ok((comics, total))
}
