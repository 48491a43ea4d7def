//! Typed change notifications for the controller's observers.
//!
//! The rendering boundary needs to distinguish "redraw the canvas" from
//! "rebuild surrounding UI chrome" from "loading state flipped", so the
//! controller emits one of three event kinds instead of a single dirty bit.
//! Consumers subscribe with a closure and filter on the variant they care
//! about.

use std::fmt;

/// A change in the controller's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The annotation list or an annotation's geometry changed.
    ContentChanged,
    /// A drawing setting (color, stroke width, font size, kind) changed.
    SettingsChanged,
    /// The image-size load state changed (loading, ready, failed).
    ReadyStateChanged,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u32);

/// Registry of boxed listener closures, invoked in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u32,
    entries: Vec<(ListenerId, Box<dyn FnMut(ChangeEvent)>)>,
}

impl Listeners {
    pub(crate) fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(ChangeEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, event: ChangeEvent) {
        for (_, listener) in &mut self.entries {
            listener(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
