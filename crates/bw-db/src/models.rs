//! Record types mapping to database tables.
//!
//! Every record carries an integer surrogate key. A key of `0` means "not
//! yet stored": [`crate::mapper::insert`] lets SQLite assign one and writes
//! it back into the record.

use chrono::Utc;
use rusqlite::types::ToSql;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::mapper::{Entity, FromRow, Record, TableDef};

/// Every table the mapper knows about, in creation order.
pub static TABLES: &[&TableDef] = &[
    &POSTS,
    &BOOKS,
    &AUTHORS,
    &GENRES,
    &PUBLISHERS,
    &SERIES,
    &LANGUAGES,
];

// ---------------------------------------------------------------------------
// Post
// ---------------------------------------------------------------------------

pub const POSTS: TableDef = TableDef {
    name: "posts",
    key: "post_id",
    columns: &["created", "title", "body"],
};

/// Blog-style post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    /// Creation time in nanoseconds since the unix epoch.
    pub created: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// A new, unsaved post stamped with the current time.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: 0,
            created: Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            title: title.into(),
            body: body.into(),
        }
    }
}

impl Record for Post {
    fn table(&self) -> &'static TableDef {
        &POSTS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        vec![&self.created, &self.title, &self.body]
    }
}

impl FromRow for Post {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("post_id")?,
            created: row.get("created")?,
            title: row.get("title")?,
            body: row.get("body")?,
        })
    }
}

impl Entity for Post {
    const TABLE: &'static TableDef = &POSTS;
}

// ---------------------------------------------------------------------------
// Book
// ---------------------------------------------------------------------------

pub const BOOKS: TableDef = TableDef {
    name: "books",
    key: "book_id",
    columns: &[
        "name",
        "author_id",
        "isbn",
        "pubdate",
        "edition",
        "isfiction",
        "genre_id",
        "publisher_id",
        "series_id",
        "language_id",
    ],
};

/// A book. The `*_id` fields reference the lookup tables by key only; the
/// schema does not enforce them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub author_id: i64,
    pub isbn: String,
    pub pubdate: i64,
    pub edition: i64,
    pub isfiction: bool,
    pub genre_id: i64,
    pub publisher_id: i64,
    pub series_id: i64,
    pub language_id: i64,
}

impl Record for Book {
    fn table(&self) -> &'static TableDef {
        &BOOKS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        vec![
            &self.name,
            &self.author_id,
            &self.isbn,
            &self.pubdate,
            &self.edition,
            &self.isfiction,
            &self.genre_id,
            &self.publisher_id,
            &self.series_id,
            &self.language_id,
        ]
    }
}

impl FromRow for Book {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("book_id")?,
            name: row.get("name")?,
            author_id: row.get("author_id")?,
            isbn: row.get("isbn")?,
            pubdate: row.get("pubdate")?,
            edition: row.get("edition")?,
            isfiction: row.get("isfiction")?,
            genre_id: row.get("genre_id")?,
            publisher_id: row.get("publisher_id")?,
            series_id: row.get("series_id")?,
            language_id: row.get("language_id")?,
        })
    }
}

impl Entity for Book {
    const TABLE: &'static TableDef = &BOOKS;
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

pub const AUTHORS: TableDef = TableDef {
    name: "authors",
    key: "author_id",
    columns: &["firstname", "lastname", "pseudonyms"],
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    /// Pen names, free text.
    pub pseudonyms: String,
}

impl Record for Author {
    fn table(&self) -> &'static TableDef {
        &AUTHORS
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        vec![&self.firstname, &self.lastname, &self.pseudonyms]
    }
}

impl FromRow for Author {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("author_id")?,
            firstname: row.get("firstname")?,
            lastname: row.get("lastname")?,
            pseudonyms: row.get("pseudonyms")?,
        })
    }
}

impl Entity for Author {
    const TABLE: &'static TableDef = &AUTHORS;
}

// ---------------------------------------------------------------------------
// Lookup tables (id + name)
// ---------------------------------------------------------------------------

/// Declare an `{id, name}` lookup record together with its table.
macro_rules! named_record {
    ($($(#[doc = $doc:expr])* $name:ident => $table:ident($table_name:literal, $key:literal)),+ $(,)?) => {
        $(
            pub const $table: TableDef = TableDef {
                name: $table_name,
                key: $key,
                columns: &["name"],
            };

            $(#[doc = $doc])*
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            pub struct $name {
                pub id: i64,
                pub name: String,
            }

            impl $name {
                /// Build a record; pass `0` as `id` to have one assigned on insert.
                pub fn new(id: i64, name: impl Into<String>) -> Self {
                    Self {
                        id,
                        name: name.into(),
                    }
                }
            }

            impl Record for $name {
                fn table(&self) -> &'static TableDef {
                    &$table
                }

                fn id(&self) -> i64 {
                    self.id
                }

                fn set_id(&mut self, id: i64) {
                    self.id = id;
                }

                fn values(&self) -> Vec<&dyn ToSql> {
                    vec![&self.name]
                }
            }

            impl FromRow for $name {
                fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
                    Ok(Self {
                        id: row.get($key)?,
                        name: row.get("name")?,
                    })
                }
            }

            impl Entity for $name {
                const TABLE: &'static TableDef = &$table;
            }
        )+
    };
}

named_record! {
    /// Literary genre, e.g. "Fantasy".
    Genre => GENRES("genres", "genre_id"),
    Publisher => PUBLISHERS("publishers", "publisher_id"),
    /// A series a book belongs to.
    Series => SERIES("series", "series_id"),
    Language => LANGUAGES("languages", "language_id"),
}
