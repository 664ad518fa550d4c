use tether_midi_events::{NotificationPayload, Topic};

/// Work for the Tether agent thread.
#[derive(Debug)]
pub enum TetherMidiMessage {
    /// Already-encoded payload
    Raw(Vec<u8>),
    Notification(Topic, NotificationPayload),
}
