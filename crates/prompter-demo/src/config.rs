//! Demo configuration with sensible defaults.
//!
//! [`DemoConfig`] captures what the demo binary takes from the command line
//! and converts it into the library types via
//! [`build_queue_config`](DemoConfig::build_queue_config) and
//! [`build_tui_config`](DemoConfig::build_tui_config).

use std::time::Duration;

use prompter::ui_log::LogBuffer;
use prompter::{DisplayMode, QueueConfig};
use prompter_tui::TuiConfig;

/// Configuration for one demo session.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// How the surface lays out pending prompts. Default: [`DisplayMode::Top`].
    pub display_mode: DisplayMode,
    /// Start with the log pane open. Default: `false`.
    pub show_logs: bool,
    /// How many times each task asks its question. Default: `2`.
    pub rounds: u32,
    /// Header title. Default: `"prompter demo"`.
    pub title: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::Top,
            show_logs: false,
            rounds: 2,
            title: "prompter demo".to_string(),
        }
    }
}

impl DemoConfig {
    pub fn build_queue_config(&self) -> QueueConfig {
        QueueConfig::default()
            .with_label("demo")
            .with_display_mode(self.display_mode)
    }

    /// Build a [`TuiConfig`] that drains `log_buffer` into its log pane.
    pub fn build_tui_config(&self, log_buffer: Option<LogBuffer>) -> TuiConfig {
        TuiConfig {
            title: self.title.clone(),
            display_mode: self.display_mode,
            log_buffer,
            show_logs: self.show_logs,
            tick: Duration::from_millis(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.display_mode, DisplayMode::Top);
        assert!(!config.show_logs);
        assert_eq!(config.rounds, 2);
        assert_eq!(config.title, "prompter demo");
    }

    #[test]
    fn queue_config_carries_display_mode() {
        let config = DemoConfig {
            display_mode: DisplayMode::Reversed,
            ..Default::default()
        };
        let queue_config = config.build_queue_config();
        assert_eq!(queue_config.label, "demo");
        assert_eq!(queue_config.display_mode, DisplayMode::Reversed);
    }

    #[test]
    fn tui_config_mirrors_demo_settings() {
        let config = DemoConfig {
            display_mode: DisplayMode::Stack,
            show_logs: true,
            title: "ask".into(),
            ..Default::default()
        };
        let tui = config.build_tui_config(Some(LogBuffer::new()));
        assert_eq!(tui.display_mode, DisplayMode::Stack);
        assert!(tui.show_logs);
        assert!(tui.log_buffer.is_some());
        assert_eq!(tui.title, "ask");

        assert!(config.build_tui_config(None).log_buffer.is_none());
    }
}
