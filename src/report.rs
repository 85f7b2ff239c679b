use crate::model::{TrendSet, TrendTopic};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub strong: Option<String>,
    pub text: String,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self { strong: None, text: text.into() }
    }

    fn labeled(strong: impl Into<String>, text: impl Into<String>) -> Self {
        Self { strong: Some(strong.into()), text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading(String),
    List(Vec<Line>),
    Paragraph(String),
    /// Shown in place of an empty category.
    Placeholder(String),
    Note(String),
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrendReport {
    pub blocks: Vec<Block>,
}

const STRATEGY: [(&str, &str); 8] = [
    ("Identify your Niche:", "How can you apply these general trends to your specific content area (e.g., gaming, cooking, fashion, education)?"),
    ("Hook Viewers Instantly:", "The first 1-3 seconds are critical. Start with something captivating."),
    ("Keep it Concise:", "Short-form platforms favor shorter videos (7-15 seconds) for higher completion rates."),
    ("Authenticity and Relatability:", "Raw, genuine content often outperforms highly produced videos."),
    ("Visuals & Text:", "Good lighting, clear audio, and on-screen text or captions are essential."),
    ("Call to Action:", "Encourage likes, comments, shares, or duets."),
    ("Consistency:", "Regular posting helps your content get seen by the algorithm."),
    ("Engage with Comments:", "Build a community around your content."),
];

const DISCLAIMER: &str = "Disclaimer: This app generates trend ideas using AI and is not connected to \
    real-time platform or search data. Always verify actual trends on the platforms themselves or official trend sites.";

impl TrendReport {
    pub fn build(topic: &TrendTopic, trends: &TrendSet) -> Self {
        let mut blocks = vec![
            Block::Title("Trend Analysis & Video Recommendations (AI-Generated)".to_string()),
            Block::Paragraph(format!(
                "Topic: {} | Region: {} ({})",
                topic.topic, topic.region_name, topic.region_code
            )),
            Block::Rule,
        ];

        category(
            &mut blocks,
            "Current Top Trending Hashtags",
            trends.hashtags.iter().map(|h| Line::labeled(h.clone(), "")).collect(),
            "No trending hashtags generated for this topic/region.",
        );
        category(
            &mut blocks,
            "Current Top Trending Songs",
            trends
                .songs
                .iter()
                .map(|s| Line::labeled(format!("\"{}\"", s.name), format!("by {}", s.artist)))
                .collect(),
            "No trending songs generated for this topic/region.",
        );
        category(
            &mut blocks,
            "Current Top Search Trends (Broader Context)",
            trends.search_terms.iter().map(|t| Line::plain(t.clone())).collect(),
            "No trending searches generated for this topic/region.",
        );

        blocks.push(Block::Rule);
        blocks.push(Block::Heading("Best Video to Create Based on These Trends".to_string()));
        recommendations(&mut blocks, trends);

        blocks.push(Block::Heading("General Video Creation Strategy".to_string()));
        blocks.push(Block::List(
            STRATEGY.iter().map(|(k, v)| Line::labeled(*k, *v)).collect(),
        ));
        blocks.push(Block::Rule);
        blocks.push(Block::Note(DISCLAIMER.to_string()));

        Self { blocks }
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::Title(t) => out.push_str(&format!("# {t}\n\n")),
                Block::Heading(h) => out.push_str(&format!("## {h}\n")),
                Block::List(lines) => {
                    for line in lines {
                        match (&line.strong, line.text.is_empty()) {
                            (Some(s), true) => out.push_str(&format!("- {s}\n")),
                            (Some(s), false) => out.push_str(&format!("- {s} {}\n", line.text)),
                            (None, _) => out.push_str(&format!("- {}\n", line.text)),
                        }
                    }
                    out.push('\n');
                }
                Block::Paragraph(p) | Block::Placeholder(p) | Block::Note(p) => {
                    out.push_str(p);
                    out.push_str("\n\n");
                }
                Block::Rule => out.push_str("---\n\n"),
            }
        }
        out
    }
}

fn category(blocks: &mut Vec<Block>, heading: &str, lines: Vec<Line>, empty: &str) {
    blocks.push(Block::Heading(heading.to_string()));
    if lines.is_empty() {
        blocks.push(Block::Placeholder(empty.to_string()));
    } else {
        blocks.push(Block::List(lines));
    }
}

fn recommendations(blocks: &mut Vec<Block>, trends: &TrendSet) {
    if trends.is_empty() {
        blocks.push(Block::Paragraph(
            "No trend data could be generated for the given topic/region. \
             Please try a different input or check your API key/network connection."
                .to_string(),
        ));
        return;
    }

    blocks.push(Block::Paragraph(
        "To create a successful short-form video, combine these AI-generated trends with your unique content:"
            .to_string(),
    ));

    let mut elements = Vec::new();
    if let Some(top) = trends.hashtags.first() {
        elements.push(Line::labeled(
            "Hashtag Focus:",
            format!(
                "Create content that directly relates to {top}. Think about challenges, POVs, \
                 or skits that fit this theme. Use it prominently in your caption."
            ),
        ));
    }
    if let Some(song) = trends.songs.first() {
        elements.push(Line::labeled(
            "Sound Sync:",
            format!(
                "Use the trending song {}. Find how others are using it and put your own creative \
                 spin on the trend or pair it with relevant visuals.",
                song.display()
            ),
        ));
    }
    let secondary: Vec<&str> = trends.hashtags.iter().skip(1).take(2).map(String::as_str).collect();
    if !secondary.is_empty() {
        elements.push(Line::labeled(
            "Secondary Hashtags:",
            format!(
                "Also consider including {} if they are relevant to broaden your reach.",
                secondary.join(" or ")
            ),
        ));
    }
    if !elements.is_empty() {
        blocks.push(Block::Heading("1. Leverage Top Short-Video Elements".to_string()));
        blocks.push(Block::List(elements));
    }

    if let Some(term) = trends.search_terms.first() {
        blocks.push(Block::Heading("2. Connect with Broader Search Trends".to_string()));
        blocks.push(Block::List(vec![
            Line::labeled(
                "Topical Relevance:",
                format!(
                    "If your content can subtly or directly connect to a high-interest search like \
                     \"{term}\", you can tap into a wider audience."
                ),
            ),
            Line::labeled(
                "Example:",
                "If a new movie is trending in search, create a meme using a trending sound about that movie.",
            ),
            Line::labeled(
                "Example:",
                "If a 'how-to' topic is trending in search, make a quick, engaging tutorial using a trending sound.",
            ),
        ]));
    }
}
