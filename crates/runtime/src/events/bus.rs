//! Topic-based event bus implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{MatchEvent, ScriptEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Round lifecycle (spawn, countdown, fight, end)
    Match,
    /// Script compilation results
    Script,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Match(MatchEvent),
    Script(ScriptEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Match(_) => Topic::Match,
            Event::Script(_) => Topic::Script,
        }
    }
}

impl From<MatchEvent> for Event {
    fn from(event: MatchEvent) -> Self {
        Event::Match(event)
    }
}

impl From<ScriptEvent> for Event {
    fn from(event: ScriptEvent) -> Self {
        Event::Script(event)
    }
}

struct Channels {
    matches: broadcast::Sender<Event>,
    scripts: broadcast::Sender<Event>,
}

impl Channels {
    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Match => &self.matches,
            Topic::Script => &self.scripts,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; a lagging subscriber
/// loses the oldest events.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                matches: broadcast::channel(capacity).0,
                scripts: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.channels.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut matches = bus.subscribe(Topic::Match);
        let mut scripts = bus.subscribe(Topic::Script);

        bus.publish(MatchEvent::FightStarted);
        assert_eq!(
            matches.recv().await.unwrap(),
            Event::Match(MatchEvent::FightStarted)
        );
        assert!(scripts.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        EventBus::new().publish(MatchEvent::Countdown { value: 3 });
    }
}
