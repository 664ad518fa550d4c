use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender},
    thread::{self, JoinHandle},
};

use log::{debug, error, info};
use tether_agent::{PlugDefinition, PlugOptionsBuilder, TetherAgentOptionsBuilder};
use tether_midi_events::{EventBus, NotificationPayload, Topic};

use crate::mediation::messages::TetherMidiMessage;

pub struct TetherSettings {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: String,
    pub id: Option<String>,
}

/// isConnected, URI if connected
pub type TetherStateMessage = (bool, Option<String>);

/// Hands notifications to the Tether agent thread.
pub struct TetherBus {
    tx: Sender<TetherMidiMessage>,
}

impl TetherBus {
    pub fn new(tx: Sender<TetherMidiMessage>) -> Self {
        TetherBus { tx }
    }
}

impl EventBus for TetherBus {
    fn publish(&mut self, topic: Topic, payload: &NotificationPayload) {
        if let Err(e) = self
            .tx
            .send(TetherMidiMessage::Notification(topic, *payload))
        {
            error!("tether_tx SendError: {}", e);
        }
    }
}

pub fn start_tether_agent(
    rx: Receiver<TetherMidiMessage>,
    state_tx: Sender<TetherStateMessage>,
    settings: TetherSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        if let Err(e) = run_tether_agent(rx, &state_tx, settings) {
            error!("Tether agent stopped: {}", e);
            if state_tx.send((false, None)).is_err() {
                debug!("Nobody listening for Tether state");
            }
        }
    })
}

fn run_tether_agent(
    rx: Receiver<TetherMidiMessage>,
    state_tx: &Sender<TetherStateMessage>,
    settings: TetherSettings,
) -> anyhow::Result<()> {
    let mut agent = TetherAgentOptionsBuilder::new(&settings.role)
        .id(settings.id.as_deref())
        .host(settings.host.as_deref())
        .username(settings.username.as_deref())
        .password(settings.password.as_deref())
        .build()?;

    state_tx.send((agent.is_connected(), Some(String::from(agent.broker_uri()))))?;

    let mut outputs: HashMap<Topic, PlugDefinition> = HashMap::new();
    for topic in Topic::ALL {
        let plug = PlugOptionsBuilder::create_output(topic.plug_name())
            .qos(match topic {
                Topic::NoteOn | Topic::NoteOff => Some(2),
                _ => Some(1),
            })
            .build(&mut agent)?;
        outputs.insert(topic, plug);
    }
    let raw_output = PlugOptionsBuilder::create_output("raw")
        .qos(Some(0))
        .build(&mut agent)?;
    info!("Tether agent ready with {} output plugs", outputs.len() + 1);

    // Ends when every sender has been dropped
    for msg in rx.iter() {
        debug!("Tether Thread received message via Model: {:?}", &msg);
        let result = match msg {
            TetherMidiMessage::Raw(payload) => agent.publish(&raw_output, Some(&payload)),
            TetherMidiMessage::Notification(topic, payload) => match outputs.get(&topic) {
                Some(plug) => agent.encode_and_publish(plug, payload),
                None => Ok(()),
            },
        };
        if let Err(e) = result {
            error!("Failed to publish via Tether: {}", e);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn bus_forwards_notifications_to_agent_thread() {
        let (tx, rx) = mpsc::channel();
        let mut bus = TetherBus::new(tx);
        let payload = NotificationPayload::Program {
            program: 4,
            channel: 2,
        };
        bus.publish(Topic::ProgramChange, &payload);

        match rx.try_recv() {
            Ok(TetherMidiMessage::Notification(topic, received)) => {
                assert_eq!(topic, Topic::ProgramChange);
                assert_eq!(received, payload);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bus_survives_a_closed_channel() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut bus = TetherBus::new(tx);
        bus.publish(
            Topic::NoteOff,
            &NotificationPayload::Note {
                note: 1,
                velocity: 2,
                channel: 3,
            },
        );
    }
}
