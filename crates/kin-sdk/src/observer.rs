//! Change notification for [`Kinfold`](crate::Kinfold) sessions.

use std::fmt;

use serde::Serialize;

/// What a subscriber is told after every change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub tree_name: String,
    pub person_count: usize,
    pub tree_names: Vec<String>,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

type Callback = Box<dyn FnMut(&SessionSnapshot) + Send>;

/// Registered callbacks, called in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    /// Register `callback` and call it once with `current`.
    pub(crate) fn subscribe(&mut self, mut callback: Callback, current: &SessionSnapshot) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        callback(current);
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    pub(crate) fn notify(&mut self, snapshot: &SessionSnapshot) {
        for (_, callback) in &mut self.callbacks {
            callback(snapshot);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("next_id", &self.next_id)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn snapshot(count: usize) -> SessionSnapshot {
        SessionSnapshot {
            tree_name: "t".into(),
            person_count: count,
            tree_names: vec!["t".into()],
        }
    }

    #[test]
    fn subscribe_calls_immediately_then_on_notify() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut observers = Observers::default();
        let sink = Arc::clone(&seen);
        observers.subscribe(
            Box::new(move |s| sink.lock().unwrap().push(s.person_count)),
            &snapshot(1),
        );
        observers.notify(&snapshot(2));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let seen = Arc::new(Mutex::new(0));
        let mut observers = Observers::default();
        let sink = Arc::clone(&seen);
        let id = observers.subscribe(Box::new(move |_| *sink.lock().unwrap() += 1), &snapshot(0));

        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.notify(&snapshot(0));
        assert_eq!(*seen.lock().unwrap(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut observers = Observers::default();
        let a = observers.subscribe(Box::new(|_| {}), &snapshot(0));
        let b = observers.subscribe(Box::new(|_| {}), &snapshot(0));
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "sub-0");
    }
}
