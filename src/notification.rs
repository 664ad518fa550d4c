//! Notifications produced from decoded MIDI events, and the bus they are
//! handed to.

use std::fmt;

use serde::Serialize;

use crate::codec::{ChannelVoiceKind, SystemCommandKind};

/// Topic a notification is published under. One per channel-voice kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    NoteOn,
    NoteOff,
    PolyphonicAftertouch,
    ControllerChange,
    ProgramChange,
    ChannelAftertouch,
    PitchWheel,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::NoteOn,
        Topic::NoteOff,
        Topic::PolyphonicAftertouch,
        Topic::ControllerChange,
        Topic::ProgramChange,
        Topic::ChannelAftertouch,
        Topic::PitchWheel,
    ];

    /// Canonical name of the message kind.
    pub fn name(self) -> &'static str {
        ChannelVoiceKind::from(self).name()
    }

    /// Name of the Tether output plug carrying this topic.
    pub fn plug_name(self) -> &'static str {
        match self {
            Topic::NoteOn => "noteOn",
            Topic::NoteOff => "noteOff",
            Topic::PolyphonicAftertouch => "polyphonicAftertouch",
            Topic::ControllerChange => "controllerChange",
            Topic::ProgramChange => "programChange",
            Topic::ChannelAftertouch => "channelAftertouch",
            Topic::PitchWheel => "pitchWheel",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<ChannelVoiceKind> for Topic {
    fn from(kind: ChannelVoiceKind) -> Self {
        match kind {
            ChannelVoiceKind::NoteOff => Topic::NoteOff,
            ChannelVoiceKind::NoteOn => Topic::NoteOn,
            ChannelVoiceKind::PolyphonicAftertouch => Topic::PolyphonicAftertouch,
            ChannelVoiceKind::ControllerChange => Topic::ControllerChange,
            ChannelVoiceKind::ProgramChange => Topic::ProgramChange,
            ChannelVoiceKind::ChannelAftertouch => Topic::ChannelAftertouch,
            ChannelVoiceKind::PitchWheel => Topic::PitchWheel,
        }
    }
}

impl From<Topic> for ChannelVoiceKind {
    fn from(topic: Topic) -> Self {
        match topic {
            Topic::NoteOff => ChannelVoiceKind::NoteOff,
            Topic::NoteOn => ChannelVoiceKind::NoteOn,
            Topic::PolyphonicAftertouch => ChannelVoiceKind::PolyphonicAftertouch,
            Topic::ControllerChange => ChannelVoiceKind::ControllerChange,
            Topic::ProgramChange => ChannelVoiceKind::ProgramChange,
            Topic::ChannelAftertouch => ChannelVoiceKind::ChannelAftertouch,
            Topic::PitchWheel => ChannelVoiceKind::PitchWheel,
        }
    }
}

/// Named fields published for a channel-voice event.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(untagged)]
pub enum NotificationPayload {
    Note {
        note: u8,
        velocity: u8,
        channel: u8,
    },
    PolyphonicAftertouch {
        note: u8,
        pressure: u8,
        channel: u8,
    },
    Controller {
        control: u8,
        value: u8,
        channel: u8,
    },
    ChannelAftertouch {
        pressure: u8,
        channel: u8,
    },
    Program {
        program: u8,
        channel: u8,
    },
    PitchWheel {
        #[serde(rename = "pitchWheel")]
        pitch_wheel: u16,
        channel: u8,
    },
}

impl NotificationPayload {
    /// The payload as `(field name, value)` pairs, in publication order.
    pub fn fields(&self) -> Vec<(&'static str, u16)> {
        match *self {
            NotificationPayload::Note {
                note,
                velocity,
                channel,
            } => vec![
                ("note", note.into()),
                ("velocity", velocity.into()),
                ("channel", channel.into()),
            ],
            NotificationPayload::PolyphonicAftertouch {
                note,
                pressure,
                channel,
            } => vec![
                ("note", note.into()),
                ("pressure", pressure.into()),
                ("channel", channel.into()),
            ],
            NotificationPayload::Controller {
                control,
                value,
                channel,
            } => vec![
                ("control", control.into()),
                ("value", value.into()),
                ("channel", channel.into()),
            ],
            NotificationPayload::ChannelAftertouch { pressure, channel } => {
                vec![("pressure", pressure.into()), ("channel", channel.into())]
            }
            NotificationPayload::Program { program, channel } => {
                vec![("program", program.into()), ("channel", channel.into())]
            }
            NotificationPayload::PitchWheel {
                pitch_wheel,
                channel,
            } => vec![("pitchWheel", pitch_wheel), ("channel", channel.into())],
        }
    }

    pub fn channel(&self) -> u8 {
        match *self {
            NotificationPayload::Note { channel, .. }
            | NotificationPayload::PolyphonicAftertouch { channel, .. }
            | NotificationPayload::Controller { channel, .. }
            | NotificationPayload::ChannelAftertouch { channel, .. }
            | NotificationPayload::Program { channel, .. }
            | NotificationPayload::PitchWheel { channel, .. } => channel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub topic: Topic,
    pub payload: NotificationPayload,
}

/// How a system command is reported instead of being published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemDiagnostic {
    Clock,
    SysEx,
    SysExEnd,
    SystemReset,
    Other,
}

impl From<SystemCommandKind> for SystemDiagnostic {
    fn from(command: SystemCommandKind) -> Self {
        match command {
            SystemCommandKind::TimingClock => SystemDiagnostic::Clock,
            SystemCommandKind::SysEx => SystemDiagnostic::SysEx,
            SystemCommandKind::SysExEnd => SystemDiagnostic::SysExEnd,
            SystemCommandKind::SystemReset => SystemDiagnostic::SystemReset,
            _ => SystemDiagnostic::Other,
        }
    }
}

impl fmt::Display for SystemDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SystemDiagnostic::Clock => "MIDI Clock",
            SystemDiagnostic::SysEx => "SysEx Command",
            SystemDiagnostic::SysExEnd => "SysEx EOX",
            SystemDiagnostic::SystemReset => "MIDI System Reset",
            SystemDiagnostic::Other => "Some other MIDI System Command",
        })
    }
}

/// Receives notifications. Owned by the application; delivery and fan-out
/// are up to the implementation.
pub trait EventBus {
    fn publish(&mut self, topic: Topic, payload: &NotificationPayload);
}

impl<B: EventBus + ?Sized> EventBus for Box<B> {
    fn publish(&mut self, topic: Topic, payload: &NotificationPayload) {
        (**self).publish(topic, payload)
    }
}

/// Collects everything published, in order.
impl EventBus for Vec<Notification> {
    fn publish(&mut self, topic: Topic, payload: &NotificationPayload) {
        self.push(Notification {
            topic,
            payload: *payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_use_kind_names() {
        assert_eq!(Topic::NoteOn.name(), "NoteOn");
        assert_eq!(Topic::PitchWheel.to_string(), "PitchWheel");
        for topic in Topic::ALL {
            assert_eq!(Topic::from(ChannelVoiceKind::from(topic)), topic);
        }
    }

    #[test]
    fn payload_serializes_with_published_field_names() {
        let note = NotificationPayload::Note {
            note: 60,
            velocity: 100,
            channel: 0,
        };
        assert_eq!(
            serde_json::to_string(&note).unwrap(),
            r#"{"note":60,"velocity":100,"channel":0}"#
        );

        let bend = NotificationPayload::PitchWheel {
            pitch_wheel: 8192,
            channel: 3,
        };
        assert_eq!(
            serde_json::to_string(&bend).unwrap(),
            r#"{"pitchWheel":8192,"channel":3}"#
        );
    }

    #[test]
    fn fields_match_serialized_names() {
        let cc = NotificationPayload::Controller {
            control: 7,
            value: 80,
            channel: 1,
        };
        assert_eq!(
            cc.fields(),
            vec![("control", 7), ("value", 80), ("channel", 1)]
        );
        assert_eq!(cc.channel(), 1);
    }

    #[test]
    fn diagnostics_for_system_commands() {
        assert_eq!(
            SystemDiagnostic::from(SystemCommandKind::TimingClock),
            SystemDiagnostic::Clock
        );
        assert_eq!(
            SystemDiagnostic::from(SystemCommandKind::Start),
            SystemDiagnostic::Other
        );
        assert_eq!(SystemDiagnostic::SysExEnd.to_string(), "SysEx EOX");
    }
}
