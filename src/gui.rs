use std::time::Duration;

use circular_buffer::CircularBuffer;
use egui::{Color32, RichText};
use tether_midi_events::EventBus;

use crate::mediation::{MediationDataModel, MONITOR_LOG_LENGTH};

pub fn render_gui<B: EventBus>(model: &mut MediationDataModel<B>, ui: &mut egui::Ui) {
    ui.heading("Tether Agent");
    if model.tether_connected {
        ui.label(RichText::new("Connected").color(Color32::GREEN));
        if let Some(uri) = &model.tether_uri {
            ui.label(uri);
        }
    } else {
        ui.label(RichText::new("Not connected").color(Color32::RED));
    }
    ui.label(format!(
        "{} published, {} rejected",
        model.published_count, model.rejected_count
    ));
    ui.separator();

    ui.heading("MIDI Ports Connected");

    for info in model.ports_metadata.values() {
        ui.horizontal(|ui| {
            ui.label(format!("PORT #{}: \"{}\"", info.index, info.full_name));
            if let Ok(elapsed) = info.last_received.elapsed() {
                let color = if elapsed > Duration::from_secs(5) {
                    Color32::RED
                } else if elapsed > Duration::from_secs(1) {
                    Color32::LIGHT_YELLOW
                } else {
                    Color32::GREEN
                };
                ui.label(RichText::new(format!("{:.0}s ago", elapsed.as_secs_f32())).color(color));
            }
        });
    }

    ui.separator();

    ui.columns(2, |columns| {
        render_log(
            &mut columns[0],
            "MIDI received",
            &model.midi_message_log,
        );
        render_log(
            &mut columns[1],
            "Notifications published",
            &model.tether_message_log,
        );
    });
}

fn render_log(ui: &mut egui::Ui, title: &str, log: &CircularBuffer<MONITOR_LOG_LENGTH, String>) {
    ui.heading(format!("{} (last {} max)", title, MONITOR_LOG_LENGTH));
    if log.is_empty() {
        ui.label("Nothing yet");
    } else {
        egui::ScrollArea::vertical()
            .id_source(title)
            .auto_shrink([true; 2])
            .show(ui, |ui| {
                for item in log.iter().rev() {
                    ui.label(item);
                }
            });
    }
}
