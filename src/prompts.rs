use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::model::TrendSet;

const NONE_PROVIDED: &str = "None provided.";

/// Gemini `responseSchema` for a [`TrendSet`].
pub static TREND_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "hashtags": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "songs": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "artist": { "type": "STRING" }
                    },
                    "required": ["name", "artist"]
                }
            },
            "searchTerms": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["hashtags", "songs", "searchTerms"]
    })
});

#[derive(Debug, Clone)]
pub struct TrendRequest {
    pub instruction: String,
    pub schema: Value,
}

pub fn build_trend_request(topic: &str, region_name: &str, region_code: &str) -> TrendRequest {
    let instruction = format!(
        "As a social media trend analyst, generate a list of current top trending short-video hashtags, \
         trending short-video songs (with artist if possible), and top web search trends \
         relevant to the topic '{topic}' in the region '{region_name}' ({region_code}). \
         Provide the output in a JSON format with keys: 'hashtags' (list of strings, e.g., ['#trend1', '#trend2']), \
         'songs' (list of objects with 'name' and 'artist' strings), \
         and 'searchTerms' (list of strings). \
         Ensure there are at least 5-10 items for hashtags and songs, and 5 for search terms. \
         Focus on recent and plausible trends. Avoid making up specific view counts, just list the names."
    );
    TrendRequest {
        instruction,
        schema: TREND_SCHEMA.clone(),
    }
}

fn join_or_none(items: impl IntoIterator<Item = String>) -> String {
    let joined = items.into_iter().collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        NONE_PROVIDED.to_string()
    } else {
        joined
    }
}

/// Free-text instruction asking for a video-generation prompt built on `trends`.
pub fn build_video_request(trends: &TrendSet, topic: &str, region_name: &str) -> String {
    let hashtags = join_or_none(trends.hashtags.iter().cloned());
    let songs = join_or_none(trends.songs.iter().map(|s| s.display()));
    let searches = join_or_none(trends.search_terms.iter().cloned());

    format!(
        "Create a concise, creative, and highly descriptive text-to-video AI prompt \
         for a short-form vertical video. The video should incorporate elements from the following \
         trends relevant to '{topic}' in '{region_name}'.\
         \n\n**Trending Hashtags:** {hashtags}\
         \n\n**Trending Songs:** {songs}\
         \n\n**Top Search Trends:** {searches}\
         \n\nThe video prompt should be imaginative, describe visual scenes, possible character actions, \
         and suggest a mood or style. Keep it under 150 words. Focus on a single engaging concept."
    )
}
