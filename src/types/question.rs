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

use crate::types::content::ContentBlock;

/// A single multiple-choice question. Immutable once constructed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Question {
    /// The question's unique identifier.
    id: String,
    /// Whether the prompt is text or an image reference.
    question_type: QuestionType,
    /// The prompt text, or an image URL for image questions.
    prompt: String,
    /// The four options, in display order.
    options: [String; 4],
    /// The 1-based index of the correct option. Always in `[1, 4]`.
    correct_option: u32,
    /// Ordered solution content shown after answering.
    solution: Vec<ContentBlock>,
    /// Display/sequencing hint.
    sort: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuestionType {
    Text,
    Image,
}

impl QuestionType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "image" => QuestionType::Image,
            _ => QuestionType::Text,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            QuestionType::Text => "text",
            QuestionType::Image => "image",
        }
    }
}

impl Question {
    pub fn new(
        id: String,
        question_type: QuestionType,
        prompt: String,
        options: [String; 4],
        correct_option: u32,
        solution: Vec<ContentBlock>,
        sort: i64,
    ) -> Self {
        Self {
            id,
            question_type,
            prompt,
            options,
            // The backend defaults absent fields to zero; clamp so the
            // invariant holds at the one construction point.
            correct_option: correct_option.clamp(1, 4),
            solution,
            sort,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    /// Look up an option by its 1-based index. Returns None outside `[1, 4]`.
    pub fn option(&self, index: u32) -> Option<&str> {
        match index {
            1..=4 => Some(&self.options[(index - 1) as usize]),
            _ => None,
        }
    }

    pub fn correct_option(&self) -> u32 {
        self.correct_option
    }

    pub fn is_correct(&self, choice: u32) -> bool {
        self.correct_option == choice
    }

    pub fn solution(&self) -> &[ContentBlock] {
        &self.solution
    }

    pub fn sort(&self) -> i64 {
        self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question::new(
            "q-1".to_string(),
            QuestionType::Text,
            "What is 2 + 2?".to_string(),
            [
                "3".to_string(),
                "4".to_string(),
                "5".to_string(),
                "6".to_string(),
            ],
            2,
            Vec::new(),
            1,
        )
    }

    #[test]
    fn test_option_lookup_is_one_based() {
        let q = question();
        assert_eq!(q.option(1), Some("3"));
        assert_eq!(q.option(4), Some("6"));
        assert_eq!(q.option(0), None);
        assert_eq!(q.option(5), None);
    }

    #[test]
    fn test_is_correct() {
        let q = question();
        assert!(q.is_correct(2));
        assert!(!q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn test_correct_option_is_clamped() {
        let q = Question::new(
            "q-2".to_string(),
            QuestionType::Text,
            String::new(),
            Default::default(),
            0,
            Vec::new(),
            0,
        );
        assert_eq!(q.correct_option(), 1);
        let q = Question::new(
            "q-3".to_string(),
            QuestionType::Text,
            String::new(),
            Default::default(),
            9,
            Vec::new(),
            0,
        );
        assert_eq!(q.correct_option(), 4);
    }
}
