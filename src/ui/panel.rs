//! egui drawing for the control strip.

use super::state::{ControlPanel, PanelStatus};
use crate::simulation::sink::StatsLog;
use crate::simulation::trigger::FORCE_GENERATION_LABEL;

/// Draw the strip; a click on the control queues a forced generation.
pub fn draw_panel(ctx: &egui::Context, panel: &mut ControlPanel, status: PanelStatus, log: &StatsLog) {
    egui::TopBottomPanel::top("control_strip").show(ctx, |strip| {
        strip.horizontal(|h| {
            if h.button(FORCE_GENERATION_LABEL).clicked() {
                panel.request_force();
            }
            h.separator();
            h.label(format!("Generation: {}", status.generation));
            h.separator();
            h.label(format!("Tick: {}", status.ticks_in_generation));
            h.separator();
            h.label(format!("Total ticks: {}", status.ticks));
            h.separator();
            h.label(format!("{:.1} FPS", status.fps));
        });
    });

    if panel.show_history && !log.is_empty() {
        let lines = panel.history_lines(log);
        egui::TopBottomPanel::bottom("generation_history")
            .default_height(120.0)
            .show(ctx, |history| {
                history.heading("Generations");
                egui::ScrollArea::vertical().show(history, |scroll| {
                    for line in &lines {
                        scroll.monospace(line);
                    }
                });
            });
    }
}
