use serde::{Deserialize, Serialize};

use crate::regions;

pub const DEFAULT_TOPIC: &str = "general";

/// Topic and region captured for a single trend request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendTopic {
    pub topic: String,
    pub region_name: String,
    pub region_code: String,
}

impl TrendTopic {
    /// Captures user input. A blank topic becomes "general".
    pub fn capture(topic_input: &str, region_name: &str) -> Self {
        Self {
            topic: effective_topic(topic_input),
            region_name: region_name.to_string(),
            region_code: regions::code_for(region_name).to_string(),
        }
    }
}

pub fn effective_topic(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_TOPIC.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub artist: String,
}

impl Song {
    /// `"name" by artist`
    pub fn display(&self) -> String {
        format!("\"{}\" by {}", self.name, self.artist)
    }
}

/// Structured reply of a trend-generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSet {
    pub hashtags: Vec<String>,
    pub songs: Vec<Song>,
    pub search_terms: Vec<String>,
}

impl TrendSet {
    pub fn is_empty(&self) -> bool {
        self.hashtags.is_empty() && self.songs.is_empty() && self.search_terms.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPrompt {
    pub text: String,
}
