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

use crate::api::QuizApi;
use crate::db::Database;
use crate::dto::parse_question_list;
use crate::error::Fallible;
use crate::error::NetworkError;
use crate::types::question::Question;
use crate::types::timestamp::Timestamp;

/// Composes the remote source and the bookmark store, normalizing both into
/// the domain question shape and recovering fetch failures into a typed
/// result. No retries: a failed call surfaces immediately and the caller
/// decides whether to re-invoke.
#[derive(Clone)]
pub struct QuizRepository {
    api: QuizApi,
    db: Database,
    /// How long a cached fetch body stays servable, in days.
    cache_max_age_days: i64,
}

impl QuizRepository {
    pub fn new(api: QuizApi, db: Database, cache_max_age_days: i64) -> Self {
        Self {
            api,
            db,
            cache_max_age_days,
        }
    }

    /// Fetch the question list from the backend.
    ///
    /// On a connectivity failure the last successful body is served instead,
    /// provided it is younger than the cache age limit; the result is
    /// indistinguishable from a live fetch. Cancellation is dropping the
    /// returned future, which aborts the request without being reinterpreted
    /// as any of the error kinds.
    pub async fn fetch_quizzes(&self) -> Result<Vec<Question>, NetworkError> {
        let response = match self.api.fetch_quiz_list().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                log::debug!("Transport failure: {e}");
                match self.cached_quizzes() {
                    Some(questions) => return Ok(questions),
                    None => return Err(NetworkError::NoInternet),
                }
            }
            Err(e) => return Err(NetworkError::UnknownError(e.to_string())),
        };
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::ServerError {
                code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| NetworkError::UnknownError(e.to_string()))?;
        let questions = classify_body(&body)?;
        if let Err(e) = self.db.cache_fetch(&body, Timestamp::now()) {
            // Caching is best-effort; the live result still stands.
            log::error!("Failed to cache fetch body: {e}");
        }
        Ok(questions)
    }

    /// All bookmarked questions, empty list if none.
    pub fn bookmarked_questions(&self) -> Fallible<Vec<Question>> {
        self.db.bookmarks()
    }

    pub fn bookmark(&self, question: &Question) -> Fallible<()> {
        self.db.save_bookmark(question)
    }

    pub fn unbookmark(&self, question: &Question) -> Fallible<()> {
        self.db.remove_bookmark(question.id())
    }

    /// Whether the question with the given identifier is bookmarked. An
    /// empty identifier is never bookmarked.
    pub fn is_bookmarked(&self, question_id: &str) -> Fallible<bool> {
        if question_id.is_empty() {
            return Ok(false);
        }
        self.db.is_bookmarked(question_id)
    }

    fn cached_quizzes(&self) -> Option<Vec<Question>> {
        let (body, fetched_at) = self.db.cached_fetch().ok()??;
        if Timestamp::now().days_since(fetched_at) > self.cache_max_age_days {
            log::debug!("Cached quiz list is stale.");
            return None;
        }
        let questions = classify_body(&body).ok()?;
        log::debug!("Serving {} questions from the fetch cache.", questions.len());
        Some(questions)
    }
}

/// Classify a 2xx response body into questions or a typed error.
fn classify_body(body: &str) -> Result<Vec<Question>, NetworkError> {
    if body.trim().is_empty() {
        return Err(NetworkError::NoBodyFound);
    }
    let questions =
        parse_question_list(body).map_err(|e| NetworkError::UnknownError(e.to_string()))?;
    if questions.is_empty() {
        return Err(NetworkError::EmptyDataFound);
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    use tempfile::TempDir;

    use super::*;
    use crate::types::content::ContentBlock;
    use crate::types::content::ContentType;
    use crate::types::question::QuestionType;

    const THREE_QUESTIONS: &str = r#"[
        {"uuidIdentifier": "q-1", "question": "one", "correctOption": 1, "sort": 1},
        {"uuidIdentifier": "q-2", "question": "two", "correctOption": 2, "sort": 2},
        {"uuidIdentifier": "q-3", "question": "three", "correctOption": 3, "sort": 3}
    ]"#;

    fn repository(dir: &TempDir, endpoint: &str) -> QuizRepository {
        let path = dir.path().join("quizdrill.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        QuizRepository::new(QuizApi::new(endpoint), db, 10)
    }

    /// Serve one canned HTTP response on an ephemeral port, returning the
    /// endpoint URL.
    fn serve_once(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}/mcq/content")
    }

    #[test]
    fn test_classify_body() {
        assert_eq!(classify_body(""), Err(NetworkError::NoBodyFound));
        assert_eq!(classify_body("  \n"), Err(NetworkError::NoBodyFound));
        assert_eq!(classify_body("[]"), Err(NetworkError::EmptyDataFound));
        assert!(matches!(
            classify_body("{broken"),
            Err(NetworkError::UnknownError(_))
        ));
        let questions = classify_body(THREE_QUESTIONS).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].id(), "q-1");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, &serve_once("200 OK", THREE_QUESTIONS));
        let questions = repo.fetch_quizzes().await.unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[2].prompt(), "three");
    }

    #[tokio::test]
    async fn test_fetch_empty_array() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, &serve_once("200 OK", "[]"));
        let err = repo.fetch_quizzes().await.unwrap_err();
        assert_eq!(err, NetworkError::EmptyDataFound);
    }

    #[tokio::test]
    async fn test_fetch_no_body() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, &serve_once("200 OK", ""));
        let err = repo.fetch_quizzes().await.unwrap_err();
        assert_eq!(err, NetworkError::NoBodyFound);
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, &serve_once("500 Internal Server Error", ""));
        let err = repo.fetch_quizzes().await.unwrap_err();
        assert_eq!(
            err,
            NetworkError::ServerError {
                code: 500,
                message: "Internal Server Error".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_no_internet() {
        let dir = TempDir::new().unwrap();
        // Port 1 is never listening.
        let repo = repository(&dir, "http://127.0.0.1:1/mcq/content");
        let err = repo.fetch_quizzes().await.unwrap_err();
        assert_eq!(err, NetworkError::NoInternet);
    }

    #[tokio::test]
    async fn test_fetch_serves_cache_when_offline() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, "http://127.0.0.1:1/mcq/content");
        repo.db.cache_fetch(THREE_QUESTIONS, Timestamp::now()).unwrap();
        let questions = repo.fetch_quizzes().await.unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn test_stale_cache_is_not_served() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, "http://127.0.0.1:1/mcq/content");
        let eleven_days_ago = Timestamp::new(chrono::Utc::now() - chrono::TimeDelta::days(11));
        repo.db
            .cache_fetch(THREE_QUESTIONS, eleven_days_ago)
            .unwrap();
        let err = repo.fetch_quizzes().await.unwrap_err();
        assert_eq!(err, NetworkError::NoInternet);
    }

    #[tokio::test]
    async fn test_successful_fetch_populates_cache() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, &serve_once("200 OK", THREE_QUESTIONS));
        repo.fetch_quizzes().await.unwrap();
        let (body, _) = repo.db.cached_fetch().unwrap().unwrap();
        assert_eq!(body, THREE_QUESTIONS);
    }

    #[test]
    fn test_bookmark_round_trip_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, "http://127.0.0.1:1/mcq/content");
        let q = Question::new(
            "q-9".to_string(),
            QuestionType::Image,
            "https://example.com/q.png".to_string(),
            [
                "w".to_string(),
                "x".to_string(),
                "y".to_string(),
                "z".to_string(),
            ],
            4,
            vec![ContentBlock {
                content_type: ContentType::Text,
                data: "<p>why</p>".to_string(),
            }],
            5,
        );
        repo.bookmark(&q).unwrap();
        assert!(repo.is_bookmarked("q-9").unwrap());
        assert_eq!(repo.bookmarked_questions().unwrap(), vec![q.clone()]);
        repo.unbookmark(&q).unwrap();
        assert!(!repo.is_bookmarked("q-9").unwrap());
        assert!(repo.bookmarked_questions().unwrap().is_empty());
    }

    #[test]
    fn test_empty_identifier_is_never_bookmarked() {
        let dir = TempDir::new().unwrap();
        let repo = repository(&dir, "http://127.0.0.1:1/mcq/content");
        assert!(!repo.is_bookmarked("").unwrap());
    }
}
