//! Error types for the MIDI event codec.

use thiserror::Error;

use crate::codec::MessageKind;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The first byte is not a status byte this codec can classify.
    #[error("unknown MIDI status byte: {0:#04X}")]
    UnknownStatus(u8),

    /// Classification succeeded, but no wire length is defined for the kind.
    #[error("no wire length defined for {0}")]
    UnknownLength(MessageKind),

    #[error("empty MIDI packet")]
    EmptyPacket,
}

pub type Result<T> = std::result::Result<T, Error>;
