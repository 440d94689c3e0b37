//! Control strip state

use crate::simulation::sink::{StatsLog, StatsOrigin};

/// History rows shown under the control strip by default
const DEFAULT_HISTORY_ROWS: usize = 8;

/// Control strip state, kept across frames
#[derive(Debug, Clone)]
pub struct ControlPanel {
    /// Whether the generation history panel is shown
    pub show_history: bool,
    /// Number of most recent generations listed
    pub history_rows: usize,
    /// Set by the button or the keyboard binding, consumed once per frame
    pending_force: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbers shown in the status line
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelStatus {
    /// Running generation, 1-based
    pub generation: u64,
    pub ticks: u64,
    pub ticks_in_generation: u64,
    pub fps: f32,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self {
            show_history: true,
            history_rows: DEFAULT_HISTORY_ROWS,
            pending_force: false,
        }
    }

    /// Queue a forced generation (button click or `T`)
    pub fn request_force(&mut self) {
        self.pending_force = true;
    }

    /// Take the queued request; at most one press fires per frame
    pub fn take_force_request(&mut self) -> bool {
        std::mem::take(&mut self.pending_force)
    }

    /// Bound to `H`
    pub fn toggle_history(&mut self) {
        self.show_history = !self.show_history;
    }

    /// Newest first, tagged with where each summary came from
    pub fn history_lines(&self, log: &StatsLog) -> Vec<String> {
        log.entries()
            .rev()
            .take(self.history_rows)
            .map(|(origin, stats)| match origin {
                StatsOrigin::Frame(frame) => format!("{stats}  (frame {frame})"),
                StatsOrigin::Manual => format!("{stats}  (forced)"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FitnessStats;
    use crate::simulation::driver::GenerationStats;
    use crate::simulation::sink::StatsSink;

    #[test]
    fn test_force_request_is_taken_once() {
        let mut panel = ControlPanel::new();
        panel.request_force();
        panel.request_force();
        assert!(panel.take_force_request());
        assert!(!panel.take_force_request());
    }

    #[test]
    fn test_toggle_history_flips_visibility() {
        let mut panel = ControlPanel::new();
        assert!(panel.show_history);
        panel.toggle_history();
        assert!(!panel.show_history);
        panel.toggle_history();
        assert!(panel.show_history);
    }

    #[test]
    fn test_history_newest_first() {
        let mut log = StatsLog::new();
        let fitness = FitnessStats::new(1.0, 2.0, 1.5);
        log.emit(StatsOrigin::Frame(2500), &GenerationStats { generation: 1, fitness });
        log.emit(StatsOrigin::Manual, &GenerationStats { generation: 2, fitness });

        let mut panel = ControlPanel::new();
        panel.history_rows = 1;
        assert_eq!(
            panel.history_lines(&log),
            vec!["002: min=1.00, max=2.00, avg=1.50  (forced)".to_string()]
        );
    }
}
