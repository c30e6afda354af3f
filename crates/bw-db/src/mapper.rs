//! Relational mapper: records to rows and back.
//!
//! A record type describes its table with a [`TableDef`] (table name, key
//! column, data columns) and implements [`Record`] for the write path and
//! [`FromRow`] for the read path. The functions here build the SQL from the
//! table definition, so adding a table is a matter of declaring the record
//! and listing it in [`crate::models::TABLES`].
//!
//! Keys are SQLite `INTEGER PRIMARY KEY AUTOINCREMENT` columns. Inserting a
//! record whose id is `0` lets SQLite pick the key, which is then written
//! back into the record.

use bw_core::{Error, Result};
use rusqlite::types::ToSql;
use rusqlite::{Connection, Params, Row};

use crate::models::TABLES;

/// Static description of a mapped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    /// Auto-increment primary key column.
    pub key: &'static str,
    /// Data columns, in the order [`Record::values`] returns them.
    pub columns: &'static [&'static str],
}

impl TableDef {
    fn insert_sql(&self, with_key: bool) -> String {
        let mut columns: Vec<&str> = Vec::with_capacity(self.columns.len() + 1);
        if with_key {
            columns.push(self.key);
        }
        columns.extend_from_slice(self.columns);

        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    fn update_sql(&self) -> String {
        let assignments: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c} = ?{}", i + 1))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            self.name,
            assignments.join(", "),
            self.key,
            self.columns.len() + 1
        )
    }

    fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?1", self.name, self.key)
    }

    fn select_by_key_sql(&self) -> String {
        format!("SELECT * FROM {} WHERE {} = ?1", self.name, self.key)
    }
}

/// Write side of a mapped record. Object safe so that records of different
/// types can be inserted together.
pub trait Record {
    fn table(&self) -> &'static TableDef;
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    /// Bound values for [`TableDef::columns`], same order, key excluded.
    fn values(&self) -> Vec<&dyn ToSql>;
}

/// Read side: materialize a record from a row, looking columns up by name.
pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// A record type bound to one table.
pub trait Entity: Record + FromRow {
    const TABLE: &'static TableDef;
}

/// Insert records, possibly of different types, in a single transaction.
///
/// Records with id `0` get their key assigned by SQLite; the new keys are
/// written back only once the transaction has committed, so a failed insert
/// leaves every record untouched. Returns the number of rows inserted.
pub fn insert(conn: &Connection, records: &mut [&mut dyn Record]) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    let mut assigned = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let table = record.table();
        let id = record.id();
        let mut values = record.values();

        let sql = if id == 0 {
            table.insert_sql(false)
        } else {
            values.insert(0, &id);
            table.insert_sql(true)
        };

        tx.execute(&sql, values.as_slice())
            .map_err(|e| Error::database(format!("insert into {} failed: {e}", table.name)))?;

        if id == 0 {
            assigned.push((idx, tx.last_insert_rowid()));
        }
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    for (idx, id) in assigned {
        records[idx].set_id(id);
    }

    Ok(records.len())
}

/// Update every data column of `record`, matched by primary key. Returns the
/// number of rows affected (0 when no row has that key).
pub fn update(conn: &Connection, record: &dyn Record) -> Result<usize> {
    let table = record.table();
    let id = record.id();
    let mut values = record.values();
    values.push(&id);

    conn.execute(&table.update_sql(), values.as_slice())
        .map_err(|e| Error::database(format!("update of {} failed: {e}", table.name)))
}

/// Delete `record` by primary key. Returns the number of rows affected.
pub fn delete(conn: &Connection, record: &dyn Record) -> Result<usize> {
    let table = record.table();
    conn.execute(&table.delete_sql(), [record.id()])
        .map_err(|e| Error::database(format!("delete from {} failed: {e}", table.name)))
}

/// Fetch one record by primary key.
pub fn get<T: Entity>(conn: &Connection, id: i64) -> Result<Option<T>> {
    select_one(conn, &T::TABLE.select_by_key_sql(), [id])
}

/// Run a query expected to return at most one row.
pub fn select_one<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    match conn.query_row(sql, params, T::from_row) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Run a query and materialize every row.
pub fn select_all<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map(params, T::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Run a query returning a single integer, e.g. `SELECT COUNT(*) ...`.
pub fn select_int<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<i64> {
    conn.query_row(sql, params, |row| row.get(0))
        .map_err(|e| Error::database(e.to_string()))
}

/// Number of rows in the table of `T`.
pub fn count<T: Entity>(conn: &Connection) -> Result<i64> {
    select_int(conn, &format!("SELECT COUNT(*) FROM {}", T::TABLE.name), [])
}

/// Execute a raw parameterized statement. Returns the number of rows affected.
pub fn exec<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<usize> {
    conn.execute(sql, params)
        .map_err(|e| Error::database(e.to_string()))
}

/// Delete every row from every registered table.
pub fn truncate_all(conn: &Connection) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;

    for table in TABLES {
        tx.execute(&format!("DELETE FROM {}", table.name), [])
            .map_err(|e| Error::database(format!("truncate of {} failed: {e}", table.name)))?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))
}
