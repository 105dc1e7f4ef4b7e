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
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::sleep;

use crate::error::NetworkError;
use crate::repo::QuizRepository;
use crate::session::state::QuizState;
use crate::session::state::ScreenState;
use crate::session::timer::Countdown;
use crate::types::question::Question;

/// Where the question list for a session comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum QuizMode {
    /// Fetch fresh questions from the backend.
    Fresh,
    /// Drill the locally bookmarked questions.
    Bookmarked,
}

/// The final score and the number of questions presented, reported once the
/// session reaches the Finished state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionSummary {
    pub score: u32,
    pub questions_presented: usize,
}

/// The observer's ends of the session's channels: screen states, countdown
/// ticks, and the one-shot error notifications.
pub struct SessionChannels {
    pub state_rx: watch::Receiver<QuizState>,
    pub timer_rx: watch::Receiver<u32>,
    pub error_rx: mpsc::Receiver<String>,
}

/// The quiz session controller.
///
/// A cheap clone handle: immutable collaborators and channels live in the
/// shared block, all mutable session state behind one mutex. Every operation
/// takes that lock, so transitions are serialized and the countdown and the
/// user race through the same door.
#[derive(Clone)]
pub struct QuizSession {
    shared: Arc<Shared>,
}

struct Shared {
    repo: QuizRepository,
    state_tx: watch::Sender<QuizState>,
    error_tx: mpsc::Sender<String>,
    /// The countdown's tick length. One second; shortened in tests.
    tick: Duration,
    inner: Mutex<SessionInner>,
}

struct SessionInner {
    /// The ordered question list, fixed once seeded.
    questions: Vec<Question>,
    /// Always in `[0, questions.len()]`; equals the length only when
    /// Finished.
    current_index: usize,
    total_score: u32,
    /// Bookmark status of the current question.
    bookmarked: bool,
    /// The authoritative screen state; published on every change.
    state: QuizState,
    countdown: Countdown,
}

impl QuizSession {
    pub fn new(repo: QuizRepository) -> (Self, SessionChannels) {
        Self::with_tick(repo, Duration::from_secs(1))
    }

    pub fn with_tick(repo: QuizRepository, tick: Duration) -> (Self, SessionChannels) {
        let (state_tx, state_rx) = watch::channel(QuizState::default());
        // One pending message; a notification nobody consumed in time is
        // dropped, not queued.
        let (error_tx, error_rx) = mpsc::channel(1);
        let (countdown, timer_rx) = Countdown::new();
        let session = Self {
            shared: Arc::new(Shared {
                repo,
                state_tx,
                error_tx,
                tick,
                inner: Mutex::new(SessionInner {
                    questions: Vec::new(),
                    current_index: 0,
                    total_score: 0,
                    bookmarked: false,
                    state: QuizState::default(),
                    countdown,
                }),
            }),
        };
        let channels = SessionChannels {
            state_rx,
            timer_rx,
            error_rx,
        };
        (session, channels)
    }

    /// Seed the session and show the first question.
    ///
    /// On fetch failure this emits the user-facing message for the error
    /// kind and leaves the screen state exactly as it was; re-invoking
    /// `start` is the retry.
    pub async fn start(&self, mode: QuizMode, timer_seconds: u32) {
        let questions = match mode {
            QuizMode::Fresh => match self.shared.repo.fetch_quizzes().await {
                Ok(questions) => questions,
                Err(e) => {
                    log::debug!("Fetch failed: {e}");
                    self.notify_error(e.user_message());
                    return;
                }
            },
            QuizMode::Bookmarked => match self.shared.repo.bookmarked_questions() {
                Ok(questions) => questions,
                Err(e) => {
                    log::error!("Failed to list bookmarks: {e}");
                    self.notify_error(NetworkError::UnknownError(e.to_string()).user_message());
                    return;
                }
            },
        };
        if questions.is_empty() {
            // Only the bookmarked path gets here; an empty fetch is already
            // EmptyDataFound.
            self.notify_error(NetworkError::EmptyDataFound.user_message());
            return;
        }
        let first = questions[0].clone();
        let bookmarked = self.shared.repo.is_bookmarked(first.id()).unwrap_or(false);
        let mut inner = self.lock();
        inner.questions = questions;
        inner.current_index = 0;
        inner.total_score = 0;
        inner.bookmarked = bookmarked;
        inner.state = QuizState::for_question(first);
        self.publish(&inner);
        self.start_countdown(&mut inner, timer_seconds);
    }

    /// Record the user's choice for the current question. Valid only on the
    /// Question screen; anywhere else this is a no-op, which is also what
    /// makes the countdown race single-winner: whichever of answer and
    /// timeout takes the lock first moves the screen, and the loser sees a
    /// screen it cannot act on.
    pub fn select_answer(&self, option: u32) {
        let mut inner = self.lock();
        if inner.state.screen != ScreenState::Question {
            return;
        }
        let Some(question) = inner.questions.get(inner.current_index) else {
            return;
        };
        let correct = question.is_correct(option);
        if correct {
            inner.total_score += 1;
        }
        inner.countdown.stop();
        inner.state.screen = ScreenState::AnswerExplanation;
        inner.state.answer_correct = correct;
        inner.state.selected_option = option;
        self.publish(&inner);
    }

    /// Move on: from an answered or skipped question to the next one, from
    /// a milestone into the Delight interstitial, out of the interstitial
    /// (`came_from_delight`), or into the terminal Finished state.
    pub fn advance(&self, timer_seconds: u32, came_from_delight: bool) {
        let mut inner = self.lock();
        self.advance_locked(&mut inner, timer_seconds, came_from_delight);
    }

    /// Flip the bookmark state of the current question. Fire-and-forget:
    /// store failures are logged and the screen state never changes.
    pub fn toggle_bookmark(&self) {
        let mut inner = self.lock();
        let Some(question) = inner.questions.get(inner.current_index).cloned() else {
            return;
        };
        if inner.bookmarked {
            match self.shared.repo.unbookmark(&question) {
                Ok(()) => inner.bookmarked = false,
                Err(e) => log::error!("Failed to remove bookmark: {e}"),
            }
        } else {
            match self.shared.repo.bookmark(&question) {
                Ok(()) => inner.bookmarked = true,
                Err(e) => log::error!("Failed to save bookmark: {e}"),
            }
        }
    }

    /// Bookmark status of the current question.
    pub fn is_bookmarked(&self) -> bool {
        self.lock().bookmarked
    }

    pub fn summary(&self) -> SessionSummary {
        let inner = self.lock();
        SessionSummary {
            score: inner.total_score,
            questions_presented: inner.current_index,
        }
    }

    /// Stop the countdown. Called when the hosting screen goes away, so no
    /// delayed tick mutates a discarded session.
    pub fn shutdown(&self) {
        self.lock().countdown.stop();
    }

    fn advance_locked(&self, inner: &mut SessionInner, timer_seconds: u32, came_from_delight: bool) {
        if inner.state.screen == ScreenState::Finished {
            return;
        }
        inner.countdown.stop();
        if !came_from_delight {
            inner.current_index += 1;
        }
        if inner.current_index < inner.questions.len() {
            self.start_countdown(inner, timer_seconds);
            let index = inner.current_index;
            if index > 0 && index % 5 == 0 && !came_from_delight {
                // Milestone. The displayed question stays put until the
                // interstitial is dismissed.
                inner.state.screen = ScreenState::Delight;
            } else {
                let question = inner.questions[index].clone();
                inner.bookmarked = self.shared.repo.is_bookmarked(question.id()).unwrap_or(false);
                inner.state = QuizState::for_question(question);
            }
            self.publish(inner);
        } else {
            inner.state.screen = ScreenState::Finished;
            self.publish(inner);
        }
    }

    /// Replace the countdown with a fresh one. The previous loop is
    /// invalidated before the new remaining value is published.
    fn start_countdown(&self, inner: &mut SessionInner, seconds: u32) {
        let generation = inner.countdown.stop();
        inner.countdown.publish(seconds);
        if seconds == 0 {
            return;
        }
        let session = self.clone();
        let tick = self.shared.tick;
        let handle = tokio::spawn(async move {
            let mut remaining = seconds;
            loop {
                sleep(tick).await;
                let mut inner = session.lock();
                if !inner.countdown.is_current(generation) {
                    // Replaced while we slept. No further side effects.
                    return;
                }
                remaining -= 1;
                inner.countdown.publish(remaining);
                if remaining == 0 {
                    // Timeout wins the race: mark the countdown stopped,
                    // then take the same path a manual skip would.
                    inner.countdown.stop();
                    let from_delight = inner.state.screen == ScreenState::Delight;
                    session.advance_locked(&mut inner, seconds, from_delight);
                    return;
                }
            }
        });
        inner.countdown.set_handle(handle);
    }

    fn publish(&self, inner: &SessionInner) {
        self.shared.state_tx.send_replace(inner.state.clone());
    }

    fn notify_error(&self, message: &str) {
        // Capacity-one channel: if a message is already pending, this one
        // is dropped rather than queued.
        let _ = self.shared.error_tx.try_send(message.to_string());
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.shared.inner.lock().unwrap()
    }
}
