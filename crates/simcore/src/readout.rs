//! Push-based readout publishing.
//!
//! Models project their state into small numeric snapshots every frame.
//! Display code subscribes once and receives each snapshot by reference;
//! whether that turns into a full redraw or a targeted text update is the
//! subscriber's business, never the publisher's.

/// Fan-out of per-frame readout snapshots to display subscribers.
///
/// Single-threaded by design: publishing happens inside the same frame
/// callback that stepped the model, so subscribers always observe a fully
/// stepped state.
pub struct ReadoutPublisher<T> {
    subscribers: Vec<Box<dyn FnMut(&T)>>,
}

impl<T> Default for ReadoutPublisher<T> {
    fn default() -> Self {
        ReadoutPublisher {
            subscribers: Vec::new(),
        }
    }
}

impl<T> ReadoutPublisher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver one snapshot to every subscriber, in subscription order.
    pub fn publish(&mut self, snapshot: &T) {
        for subscriber in &mut self.subscribers {
            subscriber(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_to_all_subscribers_once_per_publish() {
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ReadoutPublisher::new();

        let sink = Rc::clone(&seen_a);
        bus.subscribe(move |v: &f64| sink.borrow_mut().push(*v));
        let sink = Rc::clone(&seen_b);
        bus.subscribe(move |v: &f64| sink.borrow_mut().push(*v));

        bus.publish(&1.0);
        bus.publish(&2.5);

        assert_eq!(*seen_a.borrow(), vec![1.0, 2.5]);
        assert_eq!(*seen_b.borrow(), vec![1.0, 2.5]);
    }

    #[test]
    fn publish_with_no_subscribers_is_harmless() {
        let mut bus: ReadoutPublisher<u32> = ReadoutPublisher::new();
        bus.publish(&7);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
