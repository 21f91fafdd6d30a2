//! Controller input events
//!
//! Select events may arrive from the input subsystem at any time. They are
//! either handled immediately between frames or parked in an [`EventQueue`]
//! and drained at the start of the next frame, so no event ever lands in the
//! middle of a highlight pass.

use std::collections::VecDeque;

use crate::foundation::collections::ControllerId;

/// Discrete input event from a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Primary action pressed
    SelectStart(ControllerId),
    /// Primary action released
    SelectEnd(ControllerId),
}

impl InputEvent {
    /// Controller that produced the event
    pub fn controller(&self) -> ControllerId {
        match *self {
            Self::SelectStart(id) | Self::SelectEnd(id) => id,
        }
    }
}

/// FIFO of input events awaiting the next frame
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<InputEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event for delivery at the next frame
    pub fn push(&mut self, event: InputEvent) {
        log::trace!("EventQueue: queued {:?}", event);
        self.pending.push_back(event);
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
