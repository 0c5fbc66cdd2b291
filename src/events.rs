//! Synchronous signals raised by the shelf pipeline.
//!
//! For every mutation listeners see `RenderRequested` first and `Saved` last;
//! `Saved` is skipped when the save fails. Listeners run in registration
//! order on the caller's stack, so no two signals ever interleave.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShelfEvent {
    /// The collection changed and the display is about to be redrawn.
    RenderRequested { total: usize },
    /// The collection was written under the persisted key.
    Saved { bytes: usize },
}

type Listener = Box<dyn FnMut(&ShelfEvent)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ShelfEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &ShelfEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}
