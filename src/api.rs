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

use reqwest::Client;
use reqwest::Response;

/// The remote question source: one GET to a fixed endpoint, no pagination,
/// no internal retries. Classification of the outcome is the repository's
/// job, so this returns the raw transport result.
#[derive(Clone)]
pub struct QuizApi {
    client: Client,
    endpoint: String,
}

impl QuizApi {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub async fn fetch_quiz_list(&self) -> reqwest::Result<Response> {
        log::debug!("Fetching quiz list from {}", self.endpoint);
        self.client.get(&self.endpoint).send().await
    }
}
