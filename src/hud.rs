//! HUD presenters
//!
//! `DomHud` writes game events into the page; `LogPresenter` is the headless
//! equivalent used by the native build.

use crate::sim::{GameEvent, MatchSummary, Outcome, Presenter};

/// Headline for the end-of-match panel
pub fn summary_title(summary: &MatchSummary) -> &'static str {
    match summary.outcome {
        Outcome::TimeUp => "Time's up - you survived!",
        Outcome::Collision => "A target got through!",
    }
}

/// Body text for the end-of-match panel
pub fn summary_text(summary: &MatchSummary) -> String {
    format!("{} - final score {}", summary.level_name, summary.score)
}

/// Logs events instead of drawing them
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub last_summary: Option<MatchSummary>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MatchEnded(summary) => {
                log::info!("{} {}", summary_title(summary), summary_text(summary));
                self.last_summary = Some(summary.clone());
            }
            GameEvent::PhaseChanged(phase) => log::info!("Phase: {:?}", phase),
            other => log::debug!("{:?}", other),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::DomHud;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::Document;

    use super::*;
    use crate::sim::MatchPhase;

    /// Writes events into the page's HUD elements
    pub struct DomHud {
        document: Document,
    }

    impl DomHud {
        pub fn new(document: Document) -> Self {
            Self { document }
        }

        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = if visible {
                    el.class_list().remove_1("hidden")
                } else {
                    el.class_list().add_1("hidden")
                };
            }
        }

        pub fn set_fps(&self, fps: u32) {
            self.set_text("#hud-fps .hud-value", &fps.to_string());
        }

        fn show_phase(&self, phase: MatchPhase) {
            let menu = matches!(
                phase,
                MatchPhase::Idle | MatchPhase::Ended | MatchPhase::Abandoned
            );
            self.set_visible("level-select", menu);
            self.set_visible("hud", !menu);
            self.set_visible("countdown", phase == MatchPhase::Countdown);
            self.set_visible("crosshair", phase == MatchPhase::Active);
            if phase != MatchPhase::Ended {
                self.set_visible("summary", false);
            }
        }
    }

    impl Presenter for DomHud {
        fn present(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ScoreChanged(score) => {
                    self.set_text("#hud-score .hud-value", &score.to_string())
                }
                GameEvent::TimeChanged(text) => self.set_text("#hud-time .hud-value", text),
                GameEvent::CountdownChanged(n) => self.set_text("#countdown", &n.to_string()),
                GameEvent::PhaseChanged(phase) => self.show_phase(*phase),
                GameEvent::LevelHovered(info) => {
                    self.set_text("#level-info .level-name", &info.name);
                    self.set_text("#level-info .level-description", &info.description);
                    self.set_text(
                        "#level-info .level-stats",
                        &format!(
                            "{} targets - {}",
                            info.target_count,
                            crate::format_clock(info.game_time)
                        ),
                    );
                }
                GameEvent::TargetHit(_) => {
                    if let Some(el) = self.document.get_element_by_id("hitmarker") {
                        // Restart the CSS animation
                        let _ = el.class_list().remove_1("show");
                        let _ = el.client_width();
                        let _ = el.class_list().add_1("show");
                    }
                }
                GameEvent::MatchEnded(summary) => {
                    self.set_text("#summary .summary-title", summary_title(summary));
                    self.set_text("#summary .summary-text", &summary_text(summary));
                    self.set_visible("summary", true);
                }
            }
        }
    }
}
