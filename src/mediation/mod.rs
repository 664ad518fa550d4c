use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender},
    time::SystemTime,
};

use circular_buffer::CircularBuffer;
use log::{debug, error, info, warn};
use rmp_serde::to_vec_named;
use tether_midi_events::{EventBus, MidiEvent, NotificationPayload, Topic};

use crate::tether_interface::TetherStateMessage;

pub mod messages;

use self::messages::TetherMidiMessage;

pub struct PortInformation {
    pub index: usize,
    pub full_name: String,
    pub last_received: SystemTime,
}

/// Port index, raw MIDI packet
pub type MidiReceiverPayload = (usize, Vec<u8>);

pub const MONITOR_LOG_LENGTH: usize = 16;

/// Used when Tether is disabled: notifications are only logged.
pub struct LogOnlyBus;

impl EventBus for LogOnlyBus {
    fn publish(&mut self, topic: Topic, payload: &NotificationPayload) {
        info!("{}: {:?}", topic, payload.fields());
    }
}

pub struct MediationDataModel<B: EventBus> {
    pub midi_message_log: CircularBuffer<MONITOR_LOG_LENGTH, String>,
    pub tether_message_log: CircularBuffer<MONITOR_LOG_LENGTH, String>,
    pub midi_rx: Receiver<MidiReceiverPayload>,
    pub bus: B,
    /// Set when raw packets should be forwarded as well
    pub raw_tx: Option<Sender<TetherMidiMessage>>,
    pub ports_metadata: HashMap<String, PortInformation>,
    pub tether_connected: bool,
    pub tether_uri: Option<String>,
    pub tether_state_rx: Receiver<TetherStateMessage>,
    pub published_count: usize,
    pub rejected_count: usize,
}

impl<B: EventBus> MediationDataModel<B> {
    pub fn new(
        midi_rx: Receiver<MidiReceiverPayload>,
        bus: B,
        raw_tx: Option<Sender<TetherMidiMessage>>,
        tether_state_rx: Receiver<TetherStateMessage>,
    ) -> Self {
        MediationDataModel {
            midi_rx,
            bus,
            raw_tx,
            midi_message_log: CircularBuffer::new(),
            tether_message_log: CircularBuffer::new(),
            ports_metadata: HashMap::new(),
            tether_state_rx,
            tether_connected: false,
            tether_uri: None,
            published_count: 0,
            rejected_count: 0,
        }
    }

    pub fn add_port(&mut self, index: usize, full_name: String) {
        let port_key = format!("{index}");
        self.ports_metadata.insert(
            port_key,
            PortInformation {
                index,
                full_name,
                last_received: SystemTime::now(),
            },
        );
    }

    /// Drains everything waiting on the MIDI and Tether state channels.
    pub fn poll(&mut self) {
        while let Ok((port_index, packet)) = self.midi_rx.try_recv() {
            self.handle_incoming_midi(port_index, &packet);
        }
        while let Ok((is_connected, broker_uri)) = self.tether_state_rx.try_recv() {
            self.tether_connected = is_connected;
            self.tether_uri = broker_uri;
        }
    }

    /// Decodes one packet and publishes its notification, if it has one.
    /// Packets that do not start with a status byte are dropped.
    pub fn handle_incoming_midi(&mut self, port_index: usize, packet: &[u8]) -> Option<MidiEvent> {
        self.update_port_info(port_index);
        self.midi_message_log
            .push_back(format!("#{} {:02X?}", port_index, packet));

        let event = match MidiEvent::from_packet(packet) {
            Ok(event) => event,
            Err(e) => {
                warn!("Dropping packet from port #{}: {}", port_index, e);
                self.rejected_count += 1;
                return None;
            }
        };
        debug!("Decoded {} from port #{}: {:?}", event.kind(), port_index, event);

        if let Some(raw_tx) = &self.raw_tx {
            send_raw(raw_tx, packet);
        }

        match event.to_notification_payload() {
            Some(notification) => {
                self.bus.publish(notification.topic, &notification.payload);
                self.published_count += 1;
                let text = serde_json::to_string(&notification.payload)
                    .unwrap_or_else(|_| format!("{:?}", notification.payload));
                self.tether_message_log
                    .push_back(format!("{} {}", notification.topic, text));
            }
            None => {
                if let Some(diagnostic) = event.diagnostic() {
                    debug!("{} on port #{}", diagnostic, port_index);
                }
            }
        }

        Some(event)
    }

    fn update_port_info(&mut self, index: usize) {
        if let Some(info) = self.ports_metadata.get_mut(&format!("{index}")) {
            info.last_received = SystemTime::now();
        }
    }
}

/// Forwards the packet exactly as received, whatever length the codec
/// assigned to it.
fn send_raw(raw_tx: &Sender<TetherMidiMessage>, packet: &[u8]) {
    match to_vec_named(packet) {
        Ok(payload) => {
            if let Err(e) = raw_tx.send(TetherMidiMessage::Raw(payload)) {
                error!("tether_tx SendError: {}", e);
            }
        }
        Err(e) => error!("Failed to encode raw payload: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use tether_midi_events::Notification;

    use super::*;

    fn model() -> (
        MediationDataModel<Vec<Notification>>,
        Sender<MidiReceiverPayload>,
        Receiver<TetherMidiMessage>,
    ) {
        let (midi_tx, midi_rx) = mpsc::channel();
        let (raw_tx, raw_rx) = mpsc::channel();
        let (_state_tx, state_rx) = mpsc::channel();
        let model = MediationDataModel::new(midi_rx, Vec::new(), Some(raw_tx), state_rx);
        (model, midi_tx, raw_rx)
    }

    #[test]
    fn note_on_is_published_and_logged() {
        let (mut model, _midi_tx, raw_rx) = model();
        model.add_port(0, "Keys".into());

        let event = model.handle_incoming_midi(0, &[0x90, 0x3C, 0x64]).unwrap();
        assert_eq!(event.channel(), 0);
        assert_eq!(model.published_count, 1);
        assert_eq!(model.bus.len(), 1);
        assert_eq!(model.bus[0].topic, Topic::NoteOn);
        assert_eq!(
            model.tether_message_log.back().map(String::as_str),
            Some(r#"NoteOn {"note":60,"velocity":100,"channel":0}"#)
        );
        assert!(matches!(raw_rx.try_recv(), Ok(TetherMidiMessage::Raw(_))));
    }

    #[test]
    fn clock_is_not_published() {
        let (mut model, _midi_tx, _raw_rx) = model();
        assert!(model.handle_incoming_midi(1, &[0xF8]).is_some());
        assert_eq!(model.published_count, 0);
        assert!(model.bus.is_empty());
        assert!(model.tether_message_log.is_empty());
        assert_eq!(model.midi_message_log.len(), 1);
    }

    #[test]
    fn running_status_bytes_are_dropped() {
        let (mut model, _midi_tx, raw_rx) = model();
        assert!(model.handle_incoming_midi(0, &[0x3C, 0x00]).is_none());
        assert!(model.handle_incoming_midi(0, &[]).is_none());
        assert_eq!(model.rejected_count, 2);
        assert!(model.bus.is_empty());
        assert!(raw_rx.try_recv().is_err());
    }

    fn raw_bytes_sent(raw_rx: &Receiver<TetherMidiMessage>) -> Vec<u8> {
        match raw_rx.try_recv() {
            Ok(TetherMidiMessage::Raw(payload)) => rmp_serde::from_slice(&payload).unwrap(),
            other => panic!("expected a raw payload, got {:?}", other),
        }
    }

    #[test]
    fn raw_plug_forwards_packets_unchanged() {
        let (mut model, _midi_tx, raw_rx) = model();

        // Controller 123 reports length 2 but still carries its value byte
        model.handle_incoming_midi(0, &[0xB0, 0x7B, 0x55]).unwrap();
        assert_eq!(raw_bytes_sent(&raw_rx), vec![0xB0, 0x7B, 0x55]);

        // A short packet is not padded out to the note-on length
        model.handle_incoming_midi(0, &[0x90, 0x3C]).unwrap();
        assert_eq!(raw_bytes_sent(&raw_rx), vec![0x90, 0x3C]);

        model.handle_incoming_midi(0, &[0xF0, 0x43, 0x12, 0xF7]).unwrap();
        assert_eq!(raw_bytes_sent(&raw_rx), vec![0xF0, 0x43, 0x12, 0xF7]);
    }

    #[test]
    fn each_channel_voice_packet_reaches_the_bus_once() {
        let (mut model, _midi_tx, _raw_rx) = model();
        model.handle_incoming_midi(0, &[0xD2, 0x40]).unwrap();
        model.handle_incoming_midi(0, &[0xFE]).unwrap();
        model.handle_incoming_midi(0, &[0xC2, 0x07]).unwrap();

        assert_eq!(model.published_count, 2);
        assert_eq!(
            model.bus.iter().map(|n| n.topic).collect::<Vec<_>>(),
            vec![Topic::ChannelAftertouch, Topic::ProgramChange]
        );
        assert_eq!(model.tether_message_log.len(), 2);
    }

    #[test]
    fn poll_drains_the_midi_channel_in_order() {
        let (mut model, midi_tx, _raw_rx) = model();
        midi_tx.send((0, vec![0xB1, 0x07, 0x50])).unwrap();
        midi_tx.send((0, vec![0xE0, 0x00, 0x40])).unwrap();
        model.poll();

        let topics: Vec<Topic> = model.bus.iter().map(|n| n.topic).collect();
        assert_eq!(topics, vec![Topic::ControllerChange, Topic::PitchWheel]);
    }
}
