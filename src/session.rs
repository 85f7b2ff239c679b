use std::sync::Arc;

use thiserror::Error;

use crate::gateway::{Gateway, GatewayError, ParsedReply};
use crate::model::{TrendSet, TrendTopic, VideoPrompt};
use crate::prompts;
use crate::queue::{Pending, TaskQueue};
use crate::report::TrendReport;

pub const ERROR_TITLE: &str = "Operation Error";

const EMPTY_TRENDS: &str =
    "LLM could not generate valid trend data. Please try again with a different topic or check API key.";
const EMPTY_VIDEO: &str = "LLM could not generate a valid video prompt. Please try again.";

fn failure_message(action: &str, err: GatewayError, empty: &str) -> String {
    match err {
        GatewayError::EmptyResult => empty.to_string(),
        other => format!("Error during {action}: {other}"),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No trend data available to generate a video prompt. Please generate trends first.")]
    NoTrendData,

    #[error("A request is already in progress.")]
    Busy,
}

/// Which actions the window should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub generate: bool,
    pub video: bool,
    pub copy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info { title: String, message: String },
    Error { title: String, message: String },
}

impl Notice {
    pub fn info(title: &str, message: &str) -> Self {
        Notice::Info { title: title.to_string(), message: message.to_string() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error { title: ERROR_TITLE.to_string(), message: message.into() }
    }
}

/// The last successful trend result together with the topic it was asked for.
#[derive(Debug, Clone)]
pub struct CurrentTrends {
    pub topic: TrendTopic,
    pub trends: TrendSet,
    pub report: TrendReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Trends,
    Video,
}

enum InFlight {
    Trends { topic: TrendTopic, pending: Pending<TrendSet> },
    Video { pending: Pending<VideoPrompt> },
}

pub struct TrendSession<G: Gateway + 'static> {
    gateway: Arc<G>,
    queue: TaskQueue,
    current: Option<CurrentTrends>,
    video_prompt: Option<VideoPrompt>,
    in_flight: Option<InFlight>,
    controls: Controls,
    status: String,
}

impl<G: Gateway + 'static> TrendSession<G> {
    pub fn new(gateway: G, queue: TaskQueue) -> Self {
        Self {
            gateway: Arc::new(gateway),
            queue,
            current: None,
            video_prompt: None,
            in_flight: None,
            controls: Controls { generate: true, video: false, copy: false },
            status: "Enter a topic and click 'Generate Trends'.".to_string(),
        }
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn current(&self) -> Option<&CurrentTrends> {
        self.current.as_ref()
    }

    pub fn video_prompt(&self) -> Option<&VideoPrompt> {
        self.video_prompt.as_ref()
    }

    pub fn in_flight(&self) -> Option<RequestKind> {
        self.in_flight.as_ref().map(|f| match f {
            InFlight::Trends { .. } => RequestKind::Trends,
            InFlight::Video { .. } => RequestKind::Video,
        })
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Queues a trend request and returns the topic it was captured with.
    pub fn generate_trends(
        &mut self,
        topic_input: &str,
        region_name: &str,
    ) -> Result<TrendTopic, SessionError> {
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }
        let topic = TrendTopic::capture(topic_input, region_name);
        tracing::info!(topic = %topic.topic, region = %topic.region_name, "generating trends");

        self.controls = Controls { generate: false, video: false, copy: false };
        self.video_prompt = None;
        self.status = "Generating trends... This may take a moment.".to_string();

        let req = prompts::build_trend_request(&topic.topic, &topic.region_name, &topic.region_code);
        let gateway = Arc::clone(&self.gateway);
        let pending = self.queue.submit("trend generation", async move {
            gateway
                .invoke(&req.instruction, Some(&req.schema))
                .await
                .and_then(ParsedReply::into_structured::<TrendSet>)
                .map_err(|e| failure_message("LLM trend data generation", e, EMPTY_TRENDS))
        });
        self.in_flight = Some(InFlight::Trends { topic: topic.clone(), pending });
        Ok(topic)
    }

    /// Queues a video-prompt request built on the current trend set.
    pub fn create_video_prompt(&mut self) -> Result<(), SessionError> {
        let Some(current) = &self.current else {
            return Err(SessionError::NoTrendData);
        };
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }
        tracing::info!(topic = %current.topic.topic, "generating video prompt");

        let instruction = prompts::build_video_request(
            &current.trends,
            &current.topic.topic,
            &current.topic.region_name,
        );
        self.controls.generate = false;
        self.controls.video = false;
        self.controls.copy = false;
        self.video_prompt = None;
        self.status = "Generating AI video prompt... This might take a bit longer.".to_string();

        let gateway = Arc::clone(&self.gateway);
        let pending = self.queue.submit("video prompt generation", async move {
            gateway
                .invoke(&instruction, None)
                .await
                .and_then(ParsedReply::into_text)
                .map(|text| VideoPrompt { text })
                .map_err(|e| failure_message("video prompt generation", e, EMPTY_VIDEO))
        });
        self.in_flight = Some(InFlight::Video { pending });
        Ok(())
    }

    /// Applies a finished request, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Notice> {
        self.finish(false)
    }

    /// Blocks until the in-flight request (if any) finishes and applies it.
    pub fn wait_idle(&mut self) -> Option<Notice> {
        self.finish(true)
    }

    fn finish(&mut self, block: bool) -> Option<Notice> {
        match self.in_flight.take()? {
            InFlight::Trends { topic, pending } => {
                let outcome = if block {
                    pending.wait()
                } else {
                    match pending.try_take() {
                        Some(outcome) => outcome,
                        None => {
                            self.in_flight = Some(InFlight::Trends { topic, pending });
                            return None;
                        }
                    }
                };
                match outcome {
                    Ok(trends) => {
                        self.apply_trends(topic, trends);
                        None
                    }
                    Err(msg) => Some(self.fail(msg)),
                }
            }
            InFlight::Video { pending } => {
                let outcome = if block {
                    pending.wait()
                } else {
                    match pending.try_take() {
                        Some(outcome) => outcome,
                        None => {
                            self.in_flight = Some(InFlight::Video { pending });
                            return None;
                        }
                    }
                };
                match outcome {
                    Ok(prompt) => Some(self.apply_video(prompt)),
                    Err(msg) => Some(self.fail(msg)),
                }
            }
        }
    }

    fn apply_trends(&mut self, topic: TrendTopic, trends: TrendSet) {
        let report = TrendReport::build(&topic, &trends);
        tracing::debug!(report = %report.to_plain_text(), "trend report");
        tracing::info!(
            hashtags = trends.hashtags.len(),
            songs = trends.songs.len(),
            searches = trends.search_terms.len(),
            "trend generation complete"
        );
        self.current = Some(CurrentTrends { topic, trends, report });
        self.controls = Controls { generate: true, video: true, copy: false };
        self.status = "Trends generated successfully. Now you can generate a video prompt.".to_string();
    }

    fn apply_video(&mut self, prompt: VideoPrompt) -> Notice {
        tracing::info!(chars = prompt.text.len(), "video prompt generation complete");
        self.video_prompt = Some(prompt);
        self.controls = Controls { generate: true, video: true, copy: true };
        self.status = "AI video prompt generated successfully!".to_string();
        Notice::info(
            "Prompt Generated",
            "AI video prompt has been generated and is displayed below. You can copy it to your clipboard.",
        )
    }

    fn fail(&mut self, msg: String) -> Notice {
        tracing::warn!("request failed: {msg}");
        self.controls = Controls {
            generate: true,
            video: self.current.is_some(),
            copy: false,
        };
        self.status = "Error occurred.".to_string();
        Notice::error(msg)
    }
}
