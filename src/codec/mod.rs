//! Decoding and encoding of single MIDI messages.

use log::debug;

use crate::{
    error::{Error, Result},
    notification::{EventBus, Notification, NotificationPayload, SystemDiagnostic, Topic},
};

pub mod tables;

pub use tables::{
    classify_channel_voice, classify_system_command, ChannelVoiceKind, MessageKind,
    SystemCommandKind, DATA_ENTRY_PLUS, LOCAL_CONTROL,
};

const DATA_MASK: u8 = 0x7F;

/// One MIDI message of up to three bytes.
///
/// Byte 0 is always the unmasked status byte; bytes 1 and 2 always have
/// bit 7 cleared. Only the first [`length`](MidiEvent::length) bytes are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    raw: [u8; 3],
    length: Option<u8>,
    kind: MessageKind,
}

impl MidiEvent {
    /// Decode from raw bytes. `b0` must be a status byte; the codec does not
    /// try to resynchronize a stream that hands it a data byte.
    pub fn decode(b0: u8, b1: u8, b2: u8) -> Result<Self> {
        if b0 < 0x80 {
            return Err(Error::UnknownStatus(b0));
        }
        if b0 < 0xF0 {
            let kind = classify_channel_voice(b0 >> 4)?;
            Ok(Self::from_channel_voice(kind, b0 & 0x0F, b1, b2))
        } else {
            let command = classify_system_command(b0).ok_or(Error::UnknownStatus(b0))?;
            Ok(Self::from_command(command, b1, b2))
        }
    }

    /// Decode a transport packet. Missing data bytes read as zero and
    /// anything past the third byte is ignored.
    pub fn from_packet(packet: &[u8]) -> Result<Self> {
        match *packet {
            [] => Err(Error::EmptyPacket),
            [b0] => Self::decode(b0, 0, 0),
            [b0, b1] => Self::decode(b0, b1, 0),
            [b0, b1, b2, ..] => Self::decode(b0, b1, b2),
        }
    }

    /// Build an event from semantic fields. Out-of-range values are masked,
    /// never rejected.
    pub fn encode(kind: MessageKind, channel: u8, byte1: u8, byte2: u8) -> Self {
        match kind {
            MessageKind::ChannelVoice(kind) => Self::from_channel_voice(kind, channel, byte1, byte2),
            MessageKind::SystemCommand(command) => Self::from_command(command, byte1, byte2),
        }
    }

    pub fn from_channel_voice(voice: ChannelVoiceKind, channel: u8, byte1: u8, byte2: u8) -> Self {
        let data1 = byte1 & DATA_MASK;
        let kind = MessageKind::ChannelVoice(voice);
        MidiEvent {
            raw: [(voice.nibble() << 4) | (channel & 0x0F), data1, byte2 & DATA_MASK],
            length: kind.wire_length(data1),
            kind,
        }
    }

    /// Data bytes are kept only for commands that carry them.
    ///
    /// The command is re-classified from its status byte, so an
    /// `Unsupported` value naming a defined byte (e.g. `Unsupported(0xF8)`)
    /// yields that command, and byte 0 always agrees with [`kind`](Self::kind).
    pub fn from_command(command: SystemCommandKind, byte1: u8, byte2: u8) -> Self {
        let status = command.status_byte();
        let command = classify_system_command(status).unwrap_or(command);
        debug_assert_eq!(command.status_byte(), status);
        let mut raw = [status, 0, 0];
        match command {
            SystemCommandKind::SongPosition => {
                raw[1] = byte1 & DATA_MASK;
                raw[2] = byte2 & DATA_MASK;
            }
            SystemCommandKind::SongSelect => raw[1] = byte1 & DATA_MASK,
            _ => {}
        }
        let kind = MessageKind::SystemCommand(command);
        MidiEvent {
            raw,
            length: kind.wire_length(raw[1]),
            kind,
        }
    }

    pub fn note_on(note: u8, velocity: u8, channel: u8) -> Self {
        Self::from_channel_voice(ChannelVoiceKind::NoteOn, channel, note, velocity)
    }

    pub fn note_off(note: u8, velocity: u8, channel: u8) -> Self {
        Self::from_channel_voice(ChannelVoiceKind::NoteOff, channel, note, velocity)
    }

    pub fn program_change(program: u8, channel: u8) -> Self {
        Self::from_channel_voice(ChannelVoiceKind::ProgramChange, channel, program, 0)
    }

    pub fn controller(control: u8, value: u8, channel: u8) -> Self {
        Self::from_channel_voice(ChannelVoiceKind::ControllerChange, channel, control, value)
    }

    /// `value` is a 14-bit pitch-wheel position, 8192 being centre.
    pub fn pitch_wheel(value: u16, channel: u8) -> Self {
        let lsb = (value & 0x7F) as u8;
        let msb = ((value >> 7) & 0x7F) as u8;
        Self::from_channel_voice(ChannelVoiceKind::PitchWheel, channel, lsb, msb)
    }

    /// Channel-voice kind, or `None` for system commands.
    pub fn status(&self) -> Option<ChannelVoiceKind> {
        match self.kind {
            MessageKind::ChannelVoice(kind) => Some(kind),
            MessageKind::SystemCommand(_) => None,
        }
    }

    /// System command, or `None` for channel-voice messages.
    pub fn command(&self) -> Option<SystemCommandKind> {
        match self.kind {
            MessageKind::SystemCommand(command) => Some(command),
            MessageKind::ChannelVoice(_) => None,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Number of significant bytes, `None` when the kind has no defined
    /// length.
    pub fn length(&self) -> Option<u8> {
        self.length
    }

    /// Low nibble of the status byte; 0 for system commands.
    pub fn channel(&self) -> u8 {
        match self.kind {
            MessageKind::ChannelVoice(_) => self.raw[0] & 0x0F,
            MessageKind::SystemCommand(_) => 0,
        }
    }

    pub fn data1(&self) -> u8 {
        self.raw[1]
    }

    pub fn data2(&self) -> u8 {
        self.raw[2]
    }

    /// `data1 | data2 << 7`; meaningful for pitch wheel and song position.
    pub fn combined14(&self) -> u16 {
        u16::from(self.raw[1]) | (u16::from(self.raw[2]) << 7)
    }

    /// All three stored bytes, including any beyond [`length`](Self::length).
    pub fn raw_bytes(&self) -> [u8; 3] {
        self.raw
    }

    /// The bytes that go on the wire.
    pub fn significant_bytes(&self) -> Result<&[u8]> {
        match self.length {
            Some(length) => Ok(&self.raw[..usize::from(length)]),
            None => Err(Error::UnknownLength(self.kind)),
        }
    }

    /// Diagnostic classification of a system command; `None` for
    /// channel-voice messages, which are published instead.
    pub fn diagnostic(&self) -> Option<SystemDiagnostic> {
        self.command().map(SystemDiagnostic::from)
    }

    /// Notification for a channel-voice event; `None` for system commands.
    pub fn to_notification_payload(&self) -> Option<Notification> {
        let kind = self.status()?;
        let (data1, data2, channel) = (self.data1(), self.data2(), self.channel());
        let payload = match kind {
            ChannelVoiceKind::NoteOn | ChannelVoiceKind::NoteOff => NotificationPayload::Note {
                note: data1,
                velocity: data2,
                channel,
            },
            ChannelVoiceKind::PolyphonicAftertouch => NotificationPayload::PolyphonicAftertouch {
                note: data1,
                pressure: data2,
                channel,
            },
            ChannelVoiceKind::ControllerChange => NotificationPayload::Controller {
                control: data1,
                value: data2,
                channel,
            },
            ChannelVoiceKind::ChannelAftertouch => NotificationPayload::ChannelAftertouch {
                pressure: data1,
                channel,
            },
            ChannelVoiceKind::ProgramChange => NotificationPayload::Program {
                program: data1,
                channel,
            },
            ChannelVoiceKind::PitchWheel => NotificationPayload::PitchWheel {
                pitch_wheel: self.combined14(),
                channel,
            },
        };
        Some(Notification {
            topic: Topic::from(kind),
            payload,
        })
    }

    /// Hands the notification, if any, to `bus` in one call. Returns whether
    /// anything was published.
    pub fn publish<B: EventBus + ?Sized>(&self, bus: &mut B) -> bool {
        match self.to_notification_payload() {
            Some(Notification { topic, payload }) => {
                bus.publish(topic, &payload);
                true
            }
            None => {
                if let Some(diagnostic) = self.diagnostic() {
                    debug!("{}", diagnostic);
                }
                false
            }
        }
    }
}

impl TryFrom<&[u8]> for MidiEvent {
    type Error = Error;

    fn try_from(packet: &[u8]) -> Result<Self> {
        Self::from_packet(packet)
    }
}
