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

use crate::types::question::Question;

/// Which screen the session is showing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScreenState {
    /// Awaiting an answer to the current question.
    Question,
    /// Answer submitted; showing correctness and the solution.
    AnswerExplanation,
    /// Celebratory interstitial, shown once per milestone.
    Delight,
    /// Terminal. Score and count are frozen.
    Finished,
}

/// What the observer renders. Published whole on every transition.
#[derive(Clone, PartialEq, Debug)]
pub struct QuizState {
    pub screen: ScreenState,
    /// Unset while nothing has been loaded yet.
    pub current_question: Option<Question>,
    /// Whether the last-submitted answer was correct.
    pub answer_correct: bool,
    /// The 1-based option the user picked; 0 while none has been.
    pub selected_option: u32,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            screen: ScreenState::Question,
            current_question: None,
            answer_correct: false,
            selected_option: 0,
        }
    }
}

impl QuizState {
    /// A fresh Question screen for the given question.
    pub fn for_question(question: Question) -> Self {
        Self {
            screen: ScreenState::Question,
            current_question: Some(question),
            answer_correct: false,
            selected_option: 0,
        }
    }
}
