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

use std::fmt;

use thiserror::Error;

pub type Fallible<T> = Result<T, ErrorReport>;

/// A generic error with a human-readable message. Used everywhere a failure
/// is not part of the fetch taxonomy below.
#[derive(Debug)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn fail<T>(message: &str) -> Fallible<T> {
    Err(ErrorReport::new(message))
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl From<std::io::Error> for ErrorReport {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<rusqlite::Error> for ErrorReport {
    fn from(e: rusqlite::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<reqwest::Error> for ErrorReport {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(e: toml::de::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// The classification of a failed quiz fetch. Recovered into a typed result
/// at the repository boundary: none of these propagate as raw errors past it.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum NetworkError {
    /// The call succeeded but yielded zero questions.
    #[error("fetch succeeded but contained no questions")]
    EmptyDataFound,
    /// The call succeeded at the transport level but carried no payload.
    #[error("fetch succeeded but carried no body")]
    NoBodyFound,
    /// The server answered with a non-success status code.
    #[error("server returned status {code}: {message}")]
    ServerError { code: u16, message: String },
    /// A transport-level I/O failure.
    #[error("no internet connection")]
    NoInternet,
    /// Anything else.
    #[error("unknown error: {0}")]
    UnknownError(String),
}

impl NetworkError {
    /// The fixed user-facing message for this failure kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::EmptyDataFound => "No quiz found, Please try again",
            NetworkError::NoBodyFound => "No Data found, Please try again",
            NetworkError::ServerError { .. } => "server error, Please try again",
            NetworkError::NoInternet => "No Internet found, Please try again",
            NetworkError::UnknownError(_) => "Something went wrong, Please try again",
        }
    }
}
