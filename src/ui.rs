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

//! The terminal front-end: renders whatever state the session publishes and
//! forwards user intents back into it. Everything quiz-shaped lives in the
//! session controller; this file only draws and reads lines.

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::select;

use crate::error::Fallible;
use crate::repo::QuizRepository;
use crate::session::controller::QuizMode;
use crate::session::controller::QuizSession;
use crate::session::state::QuizState;
use crate::session::state::ScreenState;
use crate::types::content::ContentType;
use crate::types::question::Question;
use crate::types::question::QuestionType;

pub async fn run_session(
    repo: QuizRepository,
    mode: QuizMode,
    timer_seconds: u32,
) -> Fallible<()> {
    let (session, mut channels) = QuizSession::new(repo);
    session.start(mode, timer_seconds).await;
    if channels.state_rx.borrow().current_question.is_none() {
        // Seeding failed; the message says why.
        if let Ok(message) = channels.error_rx.try_recv() {
            println!("{message}");
        }
        return Ok(());
    }
    {
        let state = channels.state_rx.borrow_and_update().clone();
        render(&session, &state, *channels.timer_rx.borrow());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    loop {
        select! {
            changed = channels.state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = channels.state_rx.borrow_and_update().clone();
                if state.screen == ScreenState::Finished {
                    let summary = session.summary();
                    println!();
                    println!(
                        "Quiz finished. Score: {} out of {}.",
                        summary.score, summary.questions_presented
                    );
                    break;
                }
                render(&session, &state, *channels.timer_rx.borrow());
            }
            message = channels.error_rx.recv() => {
                match message {
                    Some(message) => println!("{message}"),
                    None => break,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let state = channels.state_rx.borrow().clone();
                handle_input(&session, &state, line.trim(), timer_seconds);
            }
        }
    }
    session.shutdown();
    Ok(())
}

fn handle_input(session: &QuizSession, state: &QuizState, input: &str, timer_seconds: u32) {
    match state.screen {
        ScreenState::Question => match input {
            "1" | "2" | "3" | "4" => {
                session.select_answer(input.parse().unwrap_or(0));
            }
            "s" => session.advance(timer_seconds, false),
            "b" => {
                session.toggle_bookmark();
                if session.is_bookmarked() {
                    println!("Bookmarked.");
                } else {
                    println!("Bookmark removed.");
                }
            }
            _ => println!("Answer with 1-4, s to skip, or b to bookmark."),
        },
        ScreenState::AnswerExplanation => match input {
            "b" => {
                session.toggle_bookmark();
                if session.is_bookmarked() {
                    println!("Bookmarked.");
                } else {
                    println!("Bookmark removed.");
                }
            }
            _ => session.advance(timer_seconds, false),
        },
        ScreenState::Delight => session.advance(timer_seconds, true),
        ScreenState::Finished => {}
    }
}

fn render(session: &QuizSession, state: &QuizState, remaining: u32) {
    match state.screen {
        ScreenState::Question => {
            let Some(question) = &state.current_question else {
                return;
            };
            println!();
            println!(
                "Question {} ({remaining}s)",
                session.summary().questions_presented + 1
            );
            render_prompt(question);
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}. {option}", i + 1);
            }
            println!("[1-4] answer  [s] skip  [b] bookmark");
        }
        ScreenState::AnswerExplanation => {
            let Some(question) = &state.current_question else {
                return;
            };
            println!();
            if state.answer_correct {
                println!("Correct!");
            } else {
                let correct = question.option(question.correct_option()).unwrap_or("");
                println!("Incorrect. The answer was {correct}.");
            }
            for block in question.solution() {
                match block.content_type {
                    ContentType::Text => println!("{}", block.data),
                    ContentType::Image => println!("[image] {}", block.data),
                }
            }
            println!("[enter] next  [b] bookmark");
        }
        ScreenState::Delight => {
            println!();
            println!(
                "Nice streak! {} questions down, score {}.",
                session.summary().questions_presented,
                session.summary().score
            );
            println!("[enter] continue");
        }
        ScreenState::Finished => {}
    }
}

fn render_prompt(question: &Question) {
    match question.question_type() {
        QuestionType::Text => println!("{}", question.prompt()),
        QuestionType::Image => println!("[image] {}", question.prompt()),
    }
}
