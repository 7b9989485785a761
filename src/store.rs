// SQLite-backed store for person records

use crate::person::{Observation, Person};
use anyhow::{Context, Result};
use log::debug;
use rusqlite::{params, Connection};
use std::path::Path;

/// Default location of the store file
pub const DEFAULT_DB_PATH: &str = "people_db.sqlite";

const CREATE_PEOPLE: &str = "CREATE TABLE IF NOT EXISTS people (
    name TEXT PRIMARY KEY,
    eye_color TEXT,
    hair_color TEXT,
    weight REAL
)";

/// Owned connection to the people store
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the store file and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        debug!("opened store at {}", path.display());
        let store = Store { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// In-memory store, mostly useful for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory store")?;
        let store = Store { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Idempotent: no effect when the table is already present
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(CREATE_PEOPLE)
            .context("Failed to create people table")?;
        Ok(())
    }

    /// Insert or replace every record, keyed by name, in a single transaction
    pub fn upsert_people(&mut self, people: &[Person]) -> Result<usize> {
        let tx = self.conn.transaction().context("Failed to begin transaction")?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO people (name, eye_color, hair_color, weight)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for person in people {
                stmt.execute(params![
                    person.name,
                    person.eye_color,
                    person.hair_color,
                    person.weight
                ])
                .with_context(|| format!("Failed to upsert '{}'", person.name))?;
            }
        }
        tx.commit().context("Failed to commit upsert")?;
        debug!("upserted {} records", people.len());
        Ok(people.len())
    }

    pub fn count(&self) -> Result<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Look up a single record by name
    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Result<Option<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, eye_color, hair_color, weight FROM people WHERE name = ?1",
        )?;
        let mut rows = stmt.query_map(params![name], |row| {
            Ok(Person {
                name: row.get(0)?,
                eye_color: row.get(1)?,
                hair_color: row.get(2)?,
                weight: row.get(3)?,
            })
        })?;
        let person = rows.next().transpose()?;
        Ok(person)
    }

    /// Every row's (eye_color, hair_color, weight), in table order
    pub fn all_rows(&self) -> Result<Vec<Observation>> {
        let mut stmt = self
            .conn
            .prepare("SELECT eye_color, hair_color, weight FROM people")?;
        let rows = stmt.query_map([], |row| {
            Ok(Observation {
                eye_color: row.get(0)?,
                hair_color: row.get(1)?,
                weight: row.get(2)?,
            })
        })?;
        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Run a `SELECT label, COUNT(*)` style query
    pub fn label_counts(&self, sql: &str) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let rows: Vec<(String, i64)> = rows.collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    /// Run a `SELECT a, b, COUNT(*)` style query
    pub fn pair_counts(&self, sql: &str) -> Result<Vec<(String, String, i64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        let rows: Vec<(String, String, i64)> = rows.collect::<rusqlite::Result<_>>()?;
        Ok(rows)
    }

    /// Close the connection, reporting any error SQLite raises while doing so
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close store")?;
        Ok(())
    }
}
