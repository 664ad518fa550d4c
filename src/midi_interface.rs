use std::{
    sync::mpsc::Sender,
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::anyhow;
use log::{error, info};
use midir::{Ignore, MidiInput, MidiInputPort};

use crate::mediation::MidiReceiverPayload;

pub fn new_midi_input() -> anyhow::Result<MidiInput> {
    let mut midi_input = MidiInput::new("midir reading input")?;
    midi_input.ignore(Ignore::None);
    Ok(midi_input)
}

pub fn list_midi_ports() -> anyhow::Result<()> {
    let midi_input = new_midi_input()?;
    for (i, p) in midi_input.ports().iter().enumerate() {
        println!("{}: {}", i, midi_input.port_name(p)?);
    }
    Ok(())
}

/// Port at `index`, with its full name.
pub fn get_midi_connection(
    midi_input: &MidiInput,
    index: usize,
) -> anyhow::Result<(MidiInputPort, String)> {
    let ports = midi_input.ports();
    let port = ports
        .get(index)
        .ok_or_else(|| anyhow!("invalid MIDI port index {}; {} available", index, ports.len()))?;
    let name = midi_input.port_name(port)?;
    Ok((port.clone(), name))
}

/// Forwards every packet received on `port` to `tx`, tagged with
/// `port_index`. The connection lives as long as the returned thread.
pub fn midi_listener_thread(
    midi_input: MidiInput,
    port: MidiInputPort,
    tx: Sender<MidiReceiverPayload>,
    port_index: usize,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // _conn_in needs to be a named parameter, because it needs to be kept alive until the end of the scope
        let _conn_in = match midi_input.connect(
            &port,
            "midir-read-input",
            move |_stamp, midi_bytes, _| {
                if let Err(e) = tx.send((port_index, midi_bytes.to_vec())) {
                    error!("midi_tx SendError on port {}: {}", port_index, e);
                }
            },
            (),
        ) {
            Ok(connection) => connection,
            Err(e) => {
                error!("Failed to connect MIDI port #{}: {}", port_index, e);
                return;
            }
        };

        info!("MIDI connection open, reading input from port #{}", port_index);

        loop {
            thread::sleep(Duration::from_millis(1));
        }
    })
}
