use std::fmt;

use crate::error::{Error, Result};

/// Controller number of "Data Entry +1". Controllers below it report a
/// wire length of 3.
pub const DATA_ENTRY_PLUS: u8 = 96;

/// Controller number of "Local Control On/Off".
pub const LOCAL_CONTROL: u8 = 122;

/// Message type carried in the high nibble of a channel-voice status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelVoiceKind {
    NoteOff,
    NoteOn,
    PolyphonicAftertouch,
    ControllerChange,
    ProgramChange,
    ChannelAftertouch,
    PitchWheel,
}

impl ChannelVoiceKind {
    pub const ALL: [ChannelVoiceKind; 7] = [
        ChannelVoiceKind::NoteOff,
        ChannelVoiceKind::NoteOn,
        ChannelVoiceKind::PolyphonicAftertouch,
        ChannelVoiceKind::ControllerChange,
        ChannelVoiceKind::ProgramChange,
        ChannelVoiceKind::ChannelAftertouch,
        ChannelVoiceKind::PitchWheel,
    ];

    pub fn nibble(self) -> u8 {
        match self {
            ChannelVoiceKind::NoteOff => 0x8,
            ChannelVoiceKind::NoteOn => 0x9,
            ChannelVoiceKind::PolyphonicAftertouch => 0xA,
            ChannelVoiceKind::ControllerChange => 0xB,
            ChannelVoiceKind::ProgramChange => 0xC,
            ChannelVoiceKind::ChannelAftertouch => 0xD,
            ChannelVoiceKind::PitchWheel => 0xE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelVoiceKind::NoteOff => "NoteOff",
            ChannelVoiceKind::NoteOn => "NoteOn",
            ChannelVoiceKind::PolyphonicAftertouch => "PolyphonicAftertouch",
            ChannelVoiceKind::ControllerChange => "ControllerChange",
            ChannelVoiceKind::ProgramChange => "ProgramChange",
            ChannelVoiceKind::ChannelAftertouch => "ChannelAftertouch",
            ChannelVoiceKind::PitchWheel => "PitchWheel",
        }
    }
}

/// A status byte in the 0xF0..=0xFF range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemCommandKind {
    SysEx,
    SongPosition,
    SongSelect,
    TuneRequest,
    SysExEnd,
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    SystemReset,
    /// Reserved or otherwise unhandled system byte (0xF1, 0xF4, 0xF5, 0xF9, 0xFD).
    /// Encoding re-classifies `byte | 0xF0`, so only those bytes survive.
    Unsupported(u8),
}

impl SystemCommandKind {
    pub fn status_byte(self) -> u8 {
        match self {
            SystemCommandKind::SysEx => 0xF0,
            SystemCommandKind::SongPosition => 0xF2,
            SystemCommandKind::SongSelect => 0xF3,
            SystemCommandKind::TuneRequest => 0xF6,
            SystemCommandKind::SysExEnd => 0xF7,
            SystemCommandKind::TimingClock => 0xF8,
            SystemCommandKind::Start => 0xFA,
            SystemCommandKind::Continue => 0xFB,
            SystemCommandKind::Stop => 0xFC,
            SystemCommandKind::ActiveSensing => 0xFE,
            SystemCommandKind::SystemReset => 0xFF,
            SystemCommandKind::Unsupported(byte) => byte | 0xF0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SystemCommandKind::SysEx => "SysEx",
            SystemCommandKind::SongPosition => "SongPosition",
            SystemCommandKind::SongSelect => "SongSelect",
            SystemCommandKind::TuneRequest => "TuneRequest",
            SystemCommandKind::SysExEnd => "SysExEnd",
            SystemCommandKind::TimingClock => "TimingClock",
            SystemCommandKind::Start => "Start",
            SystemCommandKind::Continue => "Continue",
            SystemCommandKind::Stop => "Stop",
            SystemCommandKind::ActiveSensing => "ActiveSensing",
            SystemCommandKind::SystemReset => "SystemReset",
            SystemCommandKind::Unsupported(_) => "Unsupported",
        }
    }
}

/// Either side of the status byte address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ChannelVoice(ChannelVoiceKind),
    SystemCommand(SystemCommandKind),
}

impl MessageKind {
    /// Canonical number of bytes on the wire, or `None` when the kind has no
    /// fixed length (channel aftertouch, sysex).
    ///
    /// `data1` only matters for controller changes: controllers below
    /// [`DATA_ENTRY_PLUS`], and [`LOCAL_CONTROL`], report 3 bytes and the
    /// rest report 2. Real hardware always sends controller changes as three
    /// bytes, so this is a known deviation kept for compatibility.
    pub fn wire_length(self, data1: u8) -> Option<u8> {
        match self {
            MessageKind::ChannelVoice(kind) => match kind {
                ChannelVoiceKind::ControllerChange => {
                    if data1 < DATA_ENTRY_PLUS || data1 == LOCAL_CONTROL {
                        Some(3)
                    } else {
                        Some(2)
                    }
                }
                // TODO: status + pressure is two bytes; confirm against hardware before setting it
                ChannelVoiceKind::ChannelAftertouch => None,
                ChannelVoiceKind::ProgramChange => Some(2),
                ChannelVoiceKind::NoteOff
                | ChannelVoiceKind::NoteOn
                | ChannelVoiceKind::PolyphonicAftertouch
                | ChannelVoiceKind::PitchWheel => Some(3),
            },
            MessageKind::SystemCommand(command) => match command {
                SystemCommandKind::SysEx => None,
                SystemCommandKind::SongPosition => Some(3),
                SystemCommandKind::SongSelect => Some(2),
                _ => Some(1),
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::ChannelVoice(kind) => kind.name(),
            MessageKind::SystemCommand(command) => command.name(),
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::SystemCommand(SystemCommandKind::Unsupported(byte)) => {
                write!(f, "Unsupported({:#04X})", byte)
            }
            _ => f.write_str(self.name()),
        }
    }
}

impl From<ChannelVoiceKind> for MessageKind {
    fn from(kind: ChannelVoiceKind) -> Self {
        MessageKind::ChannelVoice(kind)
    }
}

impl From<SystemCommandKind> for MessageKind {
    fn from(command: SystemCommandKind) -> Self {
        MessageKind::SystemCommand(command)
    }
}

/// Maps the high nibble of a status byte to its channel-voice kind.
/// Nibble 15 belongs to [`classify_system_command`] and is rejected here.
pub fn classify_channel_voice(nibble: u8) -> Result<ChannelVoiceKind> {
    match nibble {
        0x8 => Ok(ChannelVoiceKind::NoteOff),
        0x9 => Ok(ChannelVoiceKind::NoteOn),
        0xA => Ok(ChannelVoiceKind::PolyphonicAftertouch),
        0xB => Ok(ChannelVoiceKind::ControllerChange),
        0xC => Ok(ChannelVoiceKind::ProgramChange),
        0xD => Ok(ChannelVoiceKind::ChannelAftertouch),
        0xE => Ok(ChannelVoiceKind::PitchWheel),
        other => Err(Error::UnknownStatus(other)),
    }
}

/// Maps a full status byte to its system command. Total over 0xF0..=0xFF;
/// returns `None` for anything below that range.
pub fn classify_system_command(byte: u8) -> Option<SystemCommandKind> {
    let command = match byte {
        0xF0 => SystemCommandKind::SysEx,
        0xF2 => SystemCommandKind::SongPosition,
        0xF3 => SystemCommandKind::SongSelect,
        0xF6 => SystemCommandKind::TuneRequest,
        0xF7 => SystemCommandKind::SysExEnd,
        0xF8 => SystemCommandKind::TimingClock,
        0xFA => SystemCommandKind::Start,
        0xFB => SystemCommandKind::Continue,
        0xFC => SystemCommandKind::Stop,
        0xFE => SystemCommandKind::ActiveSensing,
        0xFF => SystemCommandKind::SystemReset,
        0xF1 | 0xF4 | 0xF5 | 0xF9 | 0xFD => SystemCommandKind::Unsupported(byte),
        _ => return None,
    };
    Some(command)
}
