//! The codec's wire bytes agree with an independent MIDI implementation.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg, ReceiverContext};
use tether_midi_events::MidiEvent;

fn parse(bytes: &[u8]) -> MidiMsg {
    let mut ctx = ReceiverContext::new();
    let (msg, _len) = MidiMsg::from_midi_with_context(bytes, &mut ctx).unwrap();
    msg
}

#[test]
fn note_on_matches() {
    let ours = MidiEvent::note_on(60, 100, 0);
    let theirs = MidiMsg::ChannelVoice {
        channel: Channel::Ch1,
        msg: ChannelVoiceMsg::NoteOn {
            note: 60,
            velocity: 100,
        },
    };
    assert_eq!(ours.significant_bytes().unwrap(), theirs.to_midi().as_slice());
}

#[test]
fn program_change_parses() {
    let ours = MidiEvent::program_change(42, 2);
    match parse(ours.significant_bytes().unwrap()) {
        MidiMsg::ChannelVoice {
            channel: Channel::Ch3,
            msg: ChannelVoiceMsg::ProgramChange { program },
        } => assert_eq!(program, 42),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn pitch_wheel_parses() {
    let ours = MidiEvent::pitch_wheel(12345, 15);
    match parse(ours.significant_bytes().unwrap()) {
        MidiMsg::ChannelVoice {
            channel: Channel::Ch16,
            msg: ChannelVoiceMsg::PitchBend { bend },
        } => assert_eq!(bend, ours.combined14()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn channel_aftertouch_is_two_bytes_on_the_wire() {
    // The codec leaves this length unset; the bytes themselves are still valid
    let ours = MidiEvent::decode(0xD0, 0x33, 0x00).unwrap();
    assert_eq!(ours.length(), None);
    match parse(&ours.raw_bytes()[..2]) {
        MidiMsg::ChannelVoice {
            channel: Channel::Ch1,
            msg: ChannelVoiceMsg::ChannelPressure { pressure },
        } => assert_eq!(pressure, 0x33),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn decodes_what_midi_msg_encodes() {
    let theirs = MidiMsg::ChannelVoice {
        channel: Channel::Ch5,
        msg: ChannelVoiceMsg::PolyPressure {
            note: 64,
            pressure: 90,
        },
    }
    .to_midi();
    let ours = MidiEvent::from_packet(&theirs).unwrap();
    assert_eq!(ours.channel(), 4);
    assert_eq!(ours.data1(), 64);
    assert_eq!(ours.data2(), 90);
    assert_eq!(ours.length(), Some(3));
}
