use std::{sync::mpsc, time::Duration};

use anyhow::anyhow;
use clap::Parser;
use eframe::egui;
use env_logger::Env;
use gui::render_gui;
use log::{info, warn};
use mediation::{LogOnlyBus, MediationDataModel};
use midi_interface::{get_midi_connection, list_midi_ports, midi_listener_thread, new_midi_input};
use settings::Cli;
use tether_interface::{start_tether_agent, TetherBus, TetherSettings};
use tether_midi_events::EventBus;

mod gui;
mod mediation;
mod midi_interface;
mod settings;
mod tether_interface;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level))
        .filter_module("paho_mqtt", log::LevelFilter::Warn)
        .filter_module("egui_glow", log::LevelFilter::Warn)
        .filter_module("egui_winit", log::LevelFilter::Warn)
        .filter_module("eframe", log::LevelFilter::Warn)
        .init();

    list_midi_ports()?;
    if cli.list_only {
        return Ok(());
    }

    if cli.midi_ports.is_empty() {
        return Err(anyhow!(
            "You must provide at least one MIDI port index(es), e.g. \"./tether-midi-events 1 2\""
        ));
    }

    let (midi_tx, midi_rx) = mpsc::channel();
    let (tether_tx, tether_rx) = mpsc::channel();
    let (tether_state_tx, tether_state_rx) = mpsc::channel();

    // Listener and agent threads are never joined; they end with the process
    let mut handles = Vec::new();

    let (bus, raw_tx): (Box<dyn EventBus>, _) = if cli.tether_disable {
        warn!("Tether connection disabled; local-mode only");
        (Box::new(LogOnlyBus), None)
    } else {
        let tether_settings = TetherSettings {
            host: cli.tether_host,
            username: cli.tether_username,
            password: cli.tether_password,
            role: cli.tether_role,
            id: cli.tether_id,
        };
        handles.push(start_tether_agent(
            tether_rx,
            tether_state_tx,
            tether_settings,
        ));
        let raw_tx = cli.publish_raw.then(|| tether_tx.clone());
        (Box::new(TetherBus::new(tether_tx)), raw_tx)
    };

    let mut model = MediationDataModel::new(midi_rx, bus, raw_tx, tether_state_rx);

    for port in cli.midi_ports {
        let midi_input = new_midi_input()?;
        let (midi_input_port, port_name) = get_midi_connection(&midi_input, port)?;
        info!("Listening on MIDI port #{}: \"{}\"", port, port_name);
        model.add_port(port, port_name);
        handles.push(midi_listener_thread(
            midi_input,
            midi_input_port,
            midi_tx.clone(),
            port,
        ));
    }

    if cli.headless_mode {
        info!("Running in headless mode; Ctrl+C to quit");
        loop {
            model.poll();
            std::thread::sleep(Duration::from_millis(1));
        }
    } else {
        info!("Running graphics mode; close the window to quit");
        let options = eframe::NativeOptions::default();
        eframe::run_native(
            "Tether MIDI Events",
            options,
            Box::new(|_cc| Box::new(model)),
        )
        .map_err(|e| anyhow!("Failed to launch GUI: {}", e))?;
        info!("GUI ended; exit now...");
        Ok(())
    }
}

impl<B: EventBus + 'static> eframe::App for MediationDataModel<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting so the monitor stays live
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            render_gui(self, ui);
        });

        self.poll();
    }
}
