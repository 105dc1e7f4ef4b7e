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

use serde::Deserialize;

use crate::types::content::ContentBlock;
use crate::types::content::ContentType;
use crate::types::question::Question;
use crate::types::question::QuestionType;

/// Wire shape of one question, as the backend sends it. Every field may be
/// absent or null; absent and null both map to empty-string/zero.
#[derive(Debug, Deserialize)]
pub struct QuestionDto {
    #[serde(default, rename = "uuidIdentifier")]
    pub uuid_identifier: Option<String>,
    #[serde(default, rename = "questionType")]
    pub question_type: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub option1: Option<String>,
    #[serde(default)]
    pub option2: Option<String>,
    #[serde(default)]
    pub option3: Option<String>,
    #[serde(default)]
    pub option4: Option<String>,
    #[serde(default, rename = "correctOption")]
    pub correct_option: Option<u32>,
    #[serde(default)]
    pub sort: Option<i64>,
    #[serde(default)]
    pub solution: Option<Vec<SolutionDto>>,
}

#[derive(Debug, Deserialize)]
pub struct SolutionDto {
    #[serde(default, rename = "contentType")]
    pub content_type: Option<String>,
    #[serde(default, rename = "contentData")]
    pub content_data: Option<String>,
}

impl QuestionDto {
    pub fn into_question(self) -> Question {
        let solution = self
            .solution
            .unwrap_or_default()
            .into_iter()
            .map(|block| ContentBlock {
                content_type: ContentType::from_tag(&block.content_type.unwrap_or_default()),
                data: block.content_data.unwrap_or_default(),
            })
            .collect();
        Question::new(
            self.uuid_identifier.unwrap_or_default(),
            QuestionType::from_tag(&self.question_type.unwrap_or_default()),
            self.question.unwrap_or_default(),
            [
                self.option1.unwrap_or_default(),
                self.option2.unwrap_or_default(),
                self.option3.unwrap_or_default(),
                self.option4.unwrap_or_default(),
            ],
            self.correct_option.unwrap_or_default(),
            solution,
            self.sort.unwrap_or_default(),
        )
    }
}

/// Parse the response body: a JSON array of question objects.
pub fn parse_question_list(body: &str) -> Result<Vec<Question>, serde_json::Error> {
    let dtos: Vec<QuestionDto> = serde_json::from_str(body)?;
    Ok(dtos.into_iter().map(QuestionDto::into_question).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let body = r#"[
            {
                "uuidIdentifier": "q-1",
                "questionType": "text",
                "question": "What is 2 + 2?",
                "option1": "3",
                "option2": "4",
                "option3": "5",
                "option4": "6",
                "correctOption": 2,
                "sort": 1,
                "solution": [
                    {"contentType": "text", "contentData": "<p>Basic arithmetic.</p>"},
                    {"contentType": "image", "contentData": "https://example.com/s.png"}
                ]
            }
        ]"#;
        let questions = parse_question_list(body).unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id(), "q-1");
        assert_eq!(q.question_type(), QuestionType::Text);
        assert_eq!(q.prompt(), "What is 2 + 2?");
        assert_eq!(q.option(2), Some("4"));
        assert_eq!(q.correct_option(), 2);
        assert_eq!(q.solution().len(), 2);
        assert_eq!(q.solution()[1].content_type, ContentType::Image);
        assert_eq!(q.sort(), 1);
    }

    #[test]
    fn test_absent_and_null_fields_default() {
        let body = r#"[{"uuidIdentifier": "q-2", "question": null, "solution": null}]"#;
        let questions = parse_question_list(body).unwrap();
        let q = &questions[0];
        assert_eq!(q.id(), "q-2");
        assert_eq!(q.prompt(), "");
        assert_eq!(q.option(1), Some(""));
        assert!(q.solution().is_empty());
        assert_eq!(q.sort(), 0);
        // A missing correctOption still lands inside [1, 4].
        assert_eq!(q.correct_option(), 1);
    }

    #[test]
    fn test_empty_array() {
        let questions = parse_question_list("[]").unwrap();
        assert!(questions.is_empty());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse_question_list("{not json").is_err());
        assert!(parse_question_list(r#"{"quizList": []}"#).is_err());
    }
}
