use eframe::egui;
use egui::{Align2, Color32, RichText};
use egui_phosphor::regular as icons;

use crate::config::Config;
use crate::gateway::GeminiGateway;
use crate::model::DEFAULT_TOPIC;
use crate::queue::TaskQueue;
use crate::regions::{self, DEFAULT_REGION};
use crate::report::{Block, TrendReport};
use crate::session::{Notice, RequestKind, TrendSession};

const ACCENT: Color32 = Color32::from_rgb(0x64, 0xff, 0xda);
const MUTED: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
const TITLE: &str = "Trend Insights (AI-Generated)";

pub(crate) fn write_clipboard_string(ctx: &egui::Context, s: &str) -> bool {
    #[cfg(windows)]
    {
        let _ = ctx;
        clipboard_win::set_clipboard_string(s).is_ok()
    }
    #[cfg(not(windows))]
    {
        ctx.output_mut(|o| o.copied_text = s.to_string());
        true
    }
}

struct TrendApp {
    session: TrendSession<GeminiGateway>,
    topic: String,
    region: String,
    region_names: Vec<&'static str>,
    notice: Option<Notice>,
}

impl TrendApp {
    fn new(cc: &eframe::CreationContext<'_>, cfg: &Config) -> anyhow::Result<Self> {
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let repaint = cc.egui_ctx.clone();
        let queue = TaskQueue::new(move || repaint.request_repaint())?;
        let gateway = GeminiGateway::new(cfg)?;
        let mut session = TrendSession::new(gateway, queue);
        if !cfg.has_api_key() {
            tracing::warn!("no Gemini API key configured");
            session.set_status(format!(
                "No API key set. Add gemini_api_key to {} or set GEMINI_API_KEY.",
                Config::path().display()
            ));
        }

        let mut app = Self {
            session,
            topic: DEFAULT_TOPIC.to_string(),
            region: DEFAULT_REGION.to_string(),
            region_names: regions::sorted_names(),
            notice: None,
        };
        if cfg.has_api_key() {
            app.fetch_trends();
        }
        Ok(app)
    }

    fn fetch_trends(&mut self) {
        match self.session.generate_trends(&self.topic, &self.region) {
            Ok(captured) => self.topic = captured.topic,
            Err(e) => self.notice = Some(Notice::error(e.to_string())),
        }
    }

    fn create_video_prompt(&mut self) {
        if let Err(e) = self.session.create_video_prompt() {
            self.notice = Some(Notice::error(e.to_string()));
        }
    }

    fn controls_row(&mut self, ui: &mut egui::Ui) {
        let enabled = self.session.controls();
        ui.horizontal(|ui| {
            ui.label("Topic/Category:");
            ui.add(
                egui::TextEdit::singleline(&mut self.topic)
                    .hint_text("e.g., gaming, cooking, news, fashion")
                    .desired_width(220.0),
            );
            ui.label("Region:");
            egui::ComboBox::from_id_source("region")
                .selected_text(self.region.as_str())
                .show_ui(ui, |ui| {
                    for name in &self.region_names {
                        ui.selectable_value(&mut self.region, name.to_string(), *name);
                    }
                });
            let generate = egui::Button::new(format!("{} Generate Trends", icons::TREND_UP));
            if ui.add_enabled(enabled.generate, generate).clicked() {
                self.fetch_trends();
            }
        });
    }

    fn trend_panel(&self, ui: &mut egui::Ui) {
        if self.session.in_flight() == Some(RequestKind::Trends) {
            ui.label(RichText::new("Asking the AI for trend insights...").color(MUTED));
            return;
        }
        match self.session.current() {
            Some(current) => draw_report(ui, &current.report),
            None => {
                ui.label(RichText::new("No trends yet.").italics().color(MUTED));
            }
        }
    }

    fn video_panel(&mut self, ui: &mut egui::Ui) {
        let enabled = self.session.controls();
        ui.vertical_centered(|ui| {
            ui.label(RichText::new("Generate AI Video Prompt").heading().color(ACCENT));
        });
        let create = egui::Button::new(format!("{} Create Video Prompt", icons::FILM_STRIP));
        if ui.add_enabled(enabled.video, create).clicked() {
            self.create_video_prompt();
        }

        let text = self
            .session
            .video_prompt()
            .map(|p| p.text.clone())
            .unwrap_or_default();
        let hint = if self.session.in_flight() == Some(RequestKind::Video) {
            "Generating video prompt..."
        } else {
            "AI video prompt will appear here..."
        };
        egui::ScrollArea::vertical()
            .id_source("video_prompt")
            .max_height(120.0)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut text.as_str())
                        .hint_text(hint)
                        .desired_rows(5)
                        .desired_width(f32::INFINITY),
                );
            });

        let copy = egui::Button::new(format!("{} Copy Prompt to Clipboard", icons::COPY));
        if ui.add_enabled(enabled.copy, copy).clicked() {
            if let Some(prompt) = self.session.video_prompt() {
                if write_clipboard_string(ui.ctx(), &prompt.text) {
                    self.notice = Some(Notice::info("Copied!", "Video prompt copied to clipboard!"));
                } else {
                    self.notice = Some(Notice::error("Failed to write clipboard."));
                }
            }
        }
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else { return };
        let (title, heading, message) = match notice {
            Notice::Info { title, message } => (title.as_str(), None, message.as_str()),
            Notice::Error { title, message } => (
                title.as_str(),
                Some("An error occurred during AI processing."),
                message.as_str(),
            ),
        };
        let mut dismissed = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                if let Some(heading) = heading {
                    ui.label(RichText::new(format!("{} {heading}", icons::WARNING)).strong());
                }
                ui.label(message);
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }
}

fn draw_report(ui: &mut egui::Ui, report: &TrendReport) {
    for block in &report.blocks {
        match block {
            Block::Title(t) => {
                ui.label(RichText::new(t).heading().strong());
            }
            Block::Heading(h) => {
                ui.add_space(6.0);
                ui.label(RichText::new(h).strong().size(16.0).color(ACCENT));
            }
            Block::List(lines) => {
                for line in lines {
                    ui.horizontal_wrapped(|ui| {
                        ui.label("•");
                        if let Some(strong) = &line.strong {
                            ui.label(RichText::new(strong).strong());
                        }
                        if !line.text.is_empty() {
                            ui.label(&line.text);
                        }
                    });
                }
            }
            Block::Paragraph(p) => {
                ui.label(p);
            }
            Block::Placeholder(p) => {
                ui.label(RichText::new(p).italics());
            }
            Block::Note(n) => {
                ui.label(RichText::new(n).italics().small().color(MUTED));
            }
            Block::Rule => {
                ui.separator();
            }
        }
    }
}

impl eframe::App for TrendApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(notice) = self.session.poll() {
            self.notice = Some(notice);
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(TITLE).size(26.0).strong().color(ACCENT));
            });
            self.controls_row(ui);
            ui.label(RichText::new(self.session.status()).color(MUTED));
        });

        egui::TopBottomPanel::bottom("video").show(ctx, |ui| {
            ui.add_space(8.0);
            self.video_panel(ui);
            ui.add_space(8.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_source("trends")
                .auto_shrink([false, false])
                .show(ui, |ui| self.trend_panel(ui));
        });

        self.notice_window(ctx);
    }
}

// Run the UI event loop on the main thread (blocking)
pub fn run_ui_main_thread(cfg: Config) -> anyhow::Result<()> {
    tracing::info!("main UI: starting event loop");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([900.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        TITLE,
        native_options,
        Box::new(move |cc| match TrendApp::new(cc, &cfg) {
            Ok(app) => Box::new(app) as Box<dyn eframe::App>,
            Err(e) => {
                tracing::error!("failed to start: {e:#}");
                Box::new(StartupError { message: format!("{e:#}") })
            }
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))?;
    tracing::info!("main UI: event loop exited");
    Ok(())
}

struct StartupError {
    message: String,
}

impl eframe::App for StartupError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Startup failed");
            ui.label(&self.message);
        });
    }
}
