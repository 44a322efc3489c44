// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed event channels published by a [`ZoomView`](crate::ZoomView).
//!
//! Each kind of notification has its own [`Channel`]. Subscribers are plain
//! closures; they run synchronously while the view handles input or frames, so
//! they cannot call back into the view. Record what is needed and act on it
//! afterwards.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Point, Vec2};

/// Handle returned by [`Channel::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A list of subscribers for one event type.
pub struct Channel<E> {
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&E)>)>,
    next_id: u64,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<E> Channel<E> {
    /// Adds a subscriber.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns `true` if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub(crate) fn emit(&mut self, event: &E) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

/// Zoom notifications.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomEvent {
    /// A zoom began.
    Start {
        /// `true` for user gestures, `false` for programmatic calls.
        by_gesture: bool,
    },
    /// A zoom settled.
    End {
        /// `true` for user gestures, `false` for programmatic calls.
        by_gesture: bool,
        /// Total zoom factor of this zoom, including any spring-back correction.
        scale: f64,
        /// Pivot of the zoom in view pixels.
        center: Point,
    },
}

/// Pan notifications.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// A pan began.
    Start {
        /// `true` for user gestures, `false` for programmatic calls.
        by_gesture: bool,
    },
    /// A pan settled.
    End {
        /// `true` for user gestures, `false` for programmatic calls.
        by_gesture: bool,
        /// Motion applied by the gesture or call, before any correction.
        delta: Vec2,
        /// Spring-back motion about to be animated; zero when none.
        correction: Vec2,
    },
}

/// A click, double click or long click in view pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapEvent {
    /// Where the pointer went down.
    pub position: Point,
}

/// All channels of a [`ZoomView`](crate::ZoomView).
#[derive(Debug, Default)]
pub struct EventChannels {
    /// Zoom start and end.
    pub zoom: Channel<ZoomEvent>,
    /// Pan start and end.
    pub drag: Channel<DragEvent>,
    /// Single clicks.
    pub click: Channel<TapEvent>,
    /// Double clicks.
    pub double_click: Channel<TapEvent>,
    /// Long clicks.
    pub long_click: Channel<TapEvent>,
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    use super::*;

    #[test]
    fn subscribers_receive_events_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut channel = Channel::<TapEvent>::default();

        let sink = Rc::clone(&seen);
        let id = channel.subscribe(move |e| sink.borrow_mut().push(e.position));
        assert_eq!(channel.len(), 1);

        channel.emit(&TapEvent {
            position: Point::new(1.0, 2.0),
        });
        assert!(channel.unsubscribe(id));
        assert!(!channel.unsubscribe(id));
        channel.emit(&TapEvent {
            position: Point::new(3.0, 4.0),
        });

        assert_eq!(*seen.borrow(), vec![Point::new(1.0, 2.0)]);
        assert!(channel.is_empty());
    }

    #[test]
    fn ids_are_not_reused() {
        let mut channel = Channel::<ZoomEvent>::default();
        let a = channel.subscribe(|_| {});
        channel.unsubscribe(a);
        let b = channel.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
