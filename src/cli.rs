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

use std::path::PathBuf;

use clap::Parser;

use crate::api::QuizApi;
use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::repo::QuizRepository;
use crate::session::controller::QuizMode;
use crate::ui;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Run a quiz session.
    Drill {
        /// Drill bookmarked questions instead of fetching fresh ones.
        #[arg(long)]
        bookmarks: bool,
        /// Seconds on the countdown for each question.
        #[arg(long)]
        timer: Option<u32>,
        /// Optional path to the data directory.
        directory: Option<String>,
    },
    /// List bookmarked questions.
    Bookmarks {
        /// Optional path to the data directory.
        directory: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            bookmarks,
            timer,
            directory,
        } => {
            let (config, repo) = open_repository(directory)?;
            let timer_seconds = timer.unwrap_or(config.timer_seconds);
            let mode = if bookmarks {
                QuizMode::Bookmarked
            } else {
                QuizMode::Fresh
            };
            ui::run_session(repo, mode, timer_seconds).await
        }
        Command::Bookmarks { directory } => {
            let (_, repo) = open_repository(directory)?;
            let questions = repo.bookmarked_questions()?;
            if questions.is_empty() {
                println!("No bookmarked questions.");
                return Ok(());
            }
            for question in &questions {
                println!("{}  {}", question.id(), question.prompt());
            }
            println!("{} bookmarked question(s).", questions.len());
            Ok(())
        }
    }
}

fn open_repository(directory: Option<String>) -> Fallible<(Config, QuizRepository)> {
    let directory: PathBuf = match directory {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let config = Config::load(&directory)?;
    let db_path = directory.join(&config.database);
    let db_path = db_path
        .to_str()
        .ok_or_else(|| ErrorReport::new("invalid database path"))?;
    let db = Database::new(db_path)?;
    let api = QuizApi::new(&config.endpoint);
    let repo = QuizRepository::new(api, db, config.cache_max_age_days);
    Ok((config, repo))
}
