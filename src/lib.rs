//! Decoding and encoding of MIDI channel-voice and system messages, and
//! their mapping onto named notifications for a message bus.
//!
//! ```
//! use tether_midi_events::{MidiEvent, Notification, Topic};
//!
//! let event = MidiEvent::decode(0x90, 0x3C, 0x64).unwrap();
//! let mut bus: Vec<Notification> = Vec::new();
//! assert!(event.publish(&mut bus));
//! assert_eq!(bus[0].topic, Topic::NoteOn);
//! ```

pub mod codec;
pub mod error;
pub mod notification;

pub use codec::{ChannelVoiceKind, MessageKind, MidiEvent, SystemCommandKind};
pub use error::{Error, Result};
pub use notification::{EventBus, Notification, NotificationPayload, SystemDiagnostic, Topic};
