//! Application-wide refresh notifications.
//!
//! Views hold an `Rc<RefreshBroadcaster>` handed to them at construction and
//! subscribe a handler. Publishing calls every handler registered at that
//! moment, synchronously and in registration order. Nothing is queued:
//! a handler registered after a publish never sees it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

/// What a refresh invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTopic {
    /// Dashboard and analytics aggregates.
    Dashboard,
    /// The skill list.
    Skills,
    /// One skill's detail snapshot.
    Skill(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Refresh(RefreshTopic),
    /// Every subtopic of the skill reached `completed` for the first time.
    /// Consumers may offer the optional review.
    CompletionDetected { skill_id: i64 },
}

pub type SubscriberId = u64;

type Handler = Rc<dyn Fn(&Signal)>;

#[derive(Default)]
pub struct RefreshBroadcaster {
    subscribers: RefCell<Vec<(SubscriberId, Handler)>>,
    next_id: Cell<SubscriberId>,
}

impl RefreshBroadcaster {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn subscribe(&self, handler: impl Fn(&Signal) + 'static) -> SubscriberId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.subscribers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn publish(&self, topic: RefreshTopic) {
        self.emit(Signal::Refresh(topic));
    }

    pub fn completion_detected(&self, skill_id: i64) {
        self.emit(Signal::CompletionDetected { skill_id });
    }

    pub fn emit(&self, signal: Signal) {
        // Snapshot first so handlers may subscribe/unsubscribe re-entrantly
        let handlers: Vec<Handler> = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();

        debug!(?signal, subscribers = handlers.len(), "broadcast");
        for handler in handlers {
            handler(&signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(bus: &RefreshBroadcaster) -> Rc<RefCell<Vec<Signal>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(move |s| sink.borrow_mut().push(*s));
        seen
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let bus = RefreshBroadcaster::new();
        let a = recorder(&bus);
        let b = recorder(&bus);

        bus.publish(RefreshTopic::Dashboard);

        assert_eq!(*a.borrow(), vec![Signal::Refresh(RefreshTopic::Dashboard)]);
        assert_eq!(*b.borrow(), vec![Signal::Refresh(RefreshTopic::Dashboard)]);
    }

    #[test]
    fn late_subscriber_misses_earlier_publish() {
        let bus = RefreshBroadcaster::new();
        bus.publish(RefreshTopic::Skills);

        let late = recorder(&bus);
        assert!(late.borrow().is_empty());

        bus.publish(RefreshTopic::Skill(4));
        assert_eq!(*late.borrow(), vec![Signal::Refresh(RefreshTopic::Skill(4))]);
    }

    #[test]
    fn signals_arrive_in_program_order() {
        let bus = RefreshBroadcaster::new();
        let seen = recorder(&bus);

        bus.publish(RefreshTopic::Skill(1));
        bus.completion_detected(1);
        bus.publish(RefreshTopic::Dashboard);

        assert_eq!(
            *seen.borrow(),
            vec![
                Signal::Refresh(RefreshTopic::Skill(1)),
                Signal::CompletionDetected { skill_id: 1 },
                Signal::Refresh(RefreshTopic::Dashboard),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = RefreshBroadcaster::new();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| c.set(c.get() + 1));

        bus.publish(RefreshTopic::Dashboard);
        assert!(bus.unsubscribe(id));
        bus.publish(RefreshTopic::Dashboard);

        assert_eq!(count.get(), 1);
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn handler_may_subscribe_during_publish() {
        let bus = RefreshBroadcaster::new();
        let inner_bus = Rc::clone(&bus);
        bus.subscribe(move |_| {
            inner_bus.subscribe(|_| {});
        });

        bus.publish(RefreshTopic::Skills);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = RefreshBroadcaster::new();
        bus.publish(RefreshTopic::Dashboard);
        bus.completion_detected(9);
    }
}
