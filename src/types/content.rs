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
use serde::Serialize;

/// A single block of solution content: either HTML-ish text or an image URL.
///
/// Serialized as `{"contentType": ..., "contentData": ...}`, the shape the
/// backend sends and the shape stored as embedded JSON in the bookmark table.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "contentType")]
    pub content_type: ContentType,
    #[serde(rename = "contentData")]
    pub data: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
}

impl ContentType {
    /// Anything that is not explicitly an image is treated as text.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "image" => ContentType::Image,
            _ => ContentType::Text,
        }
    }
}
