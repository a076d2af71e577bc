use parking_lot::Mutex;

use crate::event::{EditorEvent, EventHandler, EventTopic};

struct Subscriber {
    /// `None` receives every event
    topic: Option<EventTopic>,
    handler: Box<dyn EventHandler>,
}

impl Subscriber {
    fn wants(&self, event: &EditorEvent) -> bool {
        self.topic.is_none_or(|topic| topic == event.topic())
    }
}

/// Fans editor events out to subscribed handlers, optionally filtered by
/// topic. Handlers run synchronously, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.subscribers.lock().push(Subscriber {
            topic: None,
            handler,
        });
    }

    /// Receive only events of `topic`
    pub fn subscribe_to(&self, topic: EventTopic, handler: Box<dyn EventHandler>) {
        self.subscribers.lock().push(Subscriber {
            topic: Some(topic),
            handler,
        });
    }

    pub fn emit(&self, event: EditorEvent) {
        let mut subscribers = self.subscribers.lock();
        let mut delivered = 0;
        for subscriber in subscribers.iter_mut().filter(|s| s.wants(&event)) {
            subscriber.handler.handle_event(&event);
            delivered += 1;
        }
        log::trace!("{:?} event delivered to {delivered} handlers: {event:?}", event.topic());
    }
}
