// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::types::content::ContentBlock;
use crate::types::question::Question;
use crate::types::question::QuestionType;
use crate::types::timestamp::Timestamp;

/// Key under which the last successful fetch is cached. One endpoint, one
/// row.
const FETCH_CACHE_KEY: &str = "quiz_list";

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// Upsert a bookmark row. Replaces on conflict, so writing the same
    /// question twice leaves one row.
    pub fn save_bookmark(&self, question: &Question) -> Fallible<()> {
        log::debug!("Saving bookmark: {}", question.id());
        let solution = serde_json::to_string(question.solution())?;
        let conn = self.acquire();
        let sql = "insert or replace into bookmarks (question_id, question_type, prompt, option1, option2, option3, option4, correct_option, solution, sort) values (?, ?, ?, ?, ?, ?, ?, ?, ?, ?);";
        conn.execute(
            sql,
            (
                question.id(),
                question.question_type().as_tag(),
                question.prompt(),
                &question.options()[0],
                &question.options()[1],
                &question.options()[2],
                &question.options()[3],
                question.correct_option(),
                &solution,
                question.sort(),
            ),
        )?;
        Ok(())
    }

    /// Delete a bookmark row. Deleting an absent row is a no-op.
    pub fn remove_bookmark(&self, question_id: &str) -> Fallible<()> {
        log::debug!("Removing bookmark: {question_id}");
        let conn = self.acquire();
        conn.execute(
            "delete from bookmarks where question_id = ?;",
            [question_id],
        )?;
        Ok(())
    }

    /// Return all bookmarked questions, ordered by their sort hint.
    pub fn bookmarks(&self) -> Fallible<Vec<Question>> {
        let mut questions = Vec::new();
        let conn = self.acquire();
        let sql = "select question_id, question_type, prompt, option1, option2, option3, option4, correct_option, solution, sort from bookmarks order by sort, question_id;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let question_type: String = row.get(1)?;
            let prompt: String = row.get(2)?;
            let option1: String = row.get(3)?;
            let option2: String = row.get(4)?;
            let option3: String = row.get(5)?;
            let option4: String = row.get(6)?;
            let correct_option: u32 = row.get(7)?;
            let solution: String = row.get(8)?;
            let sort: i64 = row.get(9)?;
            let solution: Vec<ContentBlock> = serde_json::from_str(&solution)?;
            questions.push(Question::new(
                id,
                QuestionType::from_tag(&question_type),
                prompt,
                [option1, option2, option3, option4],
                correct_option,
                solution,
                sort,
            ));
        }
        Ok(questions)
    }

    /// Whether a bookmark row exists for the given question identifier.
    pub fn is_bookmarked(&self, question_id: &str) -> Fallible<bool> {
        let conn = self.acquire();
        let sql = "select exists(select 1 from bookmarks where question_id = ?);";
        let exists: bool = conn.query_row(sql, [question_id], |row| row.get(0))?;
        Ok(exists)
    }

    /// Store the body of a successful fetch, replacing any previous one.
    pub fn cache_fetch(&self, body: &str, fetched_at: Timestamp) -> Fallible<()> {
        let conn = self.acquire();
        let sql =
            "insert or replace into fetch_cache (cache_key, body, fetched_at) values (?, ?, ?);";
        conn.execute(sql, (FETCH_CACHE_KEY, body, fetched_at))?;
        Ok(())
    }

    /// The most recently cached fetch body, if any.
    pub fn cached_fetch(&self) -> Fallible<Option<(String, Timestamp)>> {
        let conn = self.acquire();
        let sql = "select body, fetched_at from fetch_cache where cache_key = ?;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([FETCH_CACHE_KEY])?;
        if let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            let fetched_at: Timestamp = row.get(1)?;
            Ok(Some((body, fetched_at)))
        } else {
            Ok(None)
        }
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["bookmarks"], |row| row.get(0))?;
    Ok(count > 0)
}
