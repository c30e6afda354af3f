//! Startup demo: a scripted tour of the relational mapper.
//!
//! Clears every table, inserts a genre, a book and two posts, updates one
//! post, reads back through the select helpers, then deletes both posts
//! (one through the mapper, one with raw SQL). Each step is logged.

use anyhow::{Context, Result};
use bw_db::mapper;
use bw_db::models::{Book, Genre, Post};
use bw_db::pool::{self, DbPool};

/// What the demo observed along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoReport {
    pub genres_after_insert: i64,
    pub posts_after_insert: i64,
    /// Rows changed by the post update.
    pub updated: usize,
    pub fetched_genre: Option<Genre>,
    pub posts: Vec<Post>,
    /// Rows removed by the two deletes combined.
    pub deleted: usize,
    pub posts_remaining: i64,
}

/// Run the demo against `pool`.
pub fn run(pool: &DbPool) -> Result<DemoReport> {
    let conn = pool::get_conn(pool)?;

    mapper::truncate_all(&conn).context("truncating tables")?;

    let mut genre = Genre::new(1, "Fantasy");
    let mut book = Book {
        id: 1,
        name: "Game of Thrones".into(),
        author_id: 1,
        isbn: "12345".into(),
        pubdate: 10000,
        edition: 1,
        isfiction: true,
        genre_id: 1,
        publisher_id: 1,
        series_id: 1,
        language_id: 1,
    };
    let mut p1 = Post::new("Go 1.1 released!", "Lorem ipsum lorem ipsum");
    let mut p2 = Post::new("Go 1.2 released!", "Lorem ipsum lorem ipsum");

    mapper::insert(&conn, &mut [&mut genre, &mut book, &mut p1, &mut p2])
        .context("inserting demo records")?;
    tracing::info!(post1 = p1.id, post2 = p2.id, "Inserted demo records");

    let genres_after_insert = mapper::count::<Genre>(&conn)?;
    tracing::info!("Genres count: {genres_after_insert}");

    let posts_after_insert =
        mapper::select_int(&conn, "select count(*) from posts", [])?;
    tracing::info!("Posts count: {posts_after_insert}");

    p2.title = "Go 1.2 is better than ever".into();
    let updated = mapper::update(&conn, &p2).context("updating post")?;
    tracing::info!("Rows updated: {updated}");

    let fetched_genre: Option<Genre> =
        mapper::select_one(&conn, "select * from genres where genre_id=?", [genre.id])?;
    match &fetched_genre {
        Some(g) => tracing::info!("Genre row: {} {}", g.id, g.name),
        None => tracing::warn!("Genre {} not found", genre.id),
    }

    let posts: Vec<Post> =
        mapper::select_all(&conn, "select * from posts order by post_id", [])?;
    tracing::info!("All rows:");
    for (i, p) in posts.iter().enumerate() {
        tracing::info!("    {i}: {p:?}");
    }

    let mut deleted = mapper::delete(&conn, &p1).context("deleting post")?;
    tracing::info!("Rows deleted: {deleted}");

    deleted += mapper::exec(&conn, "delete from posts where post_id=?", [p2.id])?;

    let posts_remaining = mapper::count::<Post>(&conn)?;
    tracing::info!("Row count - should be zero: {posts_remaining}");

    tracing::info!("Done!");

    Ok(DemoReport {
        genres_after_insert,
        posts_after_insert,
        updated,
        fetched_genre,
        posts,
        deleted,
        posts_remaining,
    })
}
