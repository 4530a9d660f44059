//! Display surfaces.
//!
//! A [`Surface`] is one region of the UI whose content is replaced wholesale:
//! the memory list, the detail panel, a strategy's results area. Handles are
//! cheap to clone and share one slot.
//!
//! Every write that starts something new (a loading indicator, a validation
//! warning, a direct replacement) bumps the surface's generation. Writes that
//! finish an orchestrated call go through a [`Ticket`] and only land while
//! that ticket's generation is still current, so a slow response can never
//! overwrite the result of a newer call.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::views::Panel;

/// What a surface currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SurfaceState {
    /// Nothing rendered yet.
    #[default]
    Empty,
    /// Input-validation warning; the operation was not attempted.
    Warning(String),
    /// Request in flight.
    Loading(String),
    /// Request failed.
    Error(String),
    /// Rendered content.
    Ready(Panel),
}

impl SurfaceState {
    /// Whether this is a loading indicator.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Proof that a caller started the surface's current generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    /// Generation this ticket was issued for.
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    state: SurfaceState,
}

#[derive(Debug)]
struct SurfaceInner {
    name: String,
    slot: RwLock<Slot>,
}

/// Shared handle to one display region.
#[derive(Debug, Clone)]
pub struct Surface {
    inner: Arc<SurfaceInner>,
}

impl Surface {
    /// Create an empty surface.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SurfaceInner {
                name: name.into(),
                slot: RwLock::new(Slot::default()),
            }),
        }
    }

    /// Surface name, used in logs and element ids.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        self.inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .state
            .clone()
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Replace the content outright, superseding any call in flight.
    pub fn show(&self, panel: Panel) {
        self.replace(SurfaceState::Ready(panel));
    }

    /// Show a validation warning, superseding any call in flight.
    pub fn show_warning(&self, message: impl Into<String>) {
        self.replace(SurfaceState::Warning(message.into()));
    }

    /// Clear the surface, superseding any call in flight.
    pub fn clear(&self) {
        self.replace(SurfaceState::Empty);
    }

    /// Show a loading indicator and hand out the ticket for the call that
    /// will finish it.
    pub fn begin_loading(&self, message: impl Into<String>) -> Ticket {
        let mut slot = self.lock();
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = SurfaceState::Loading(message.into());
        Ticket {
            generation: slot.generation,
        }
    }

    /// Whether `ticket` still owns the surface.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation() == ticket.generation
    }

    /// Write `state` if `ticket` is still current. Returns whether it landed.
    pub fn write(&self, ticket: Ticket, state: SurfaceState) -> bool {
        let mut slot = self.lock();
        if slot.generation != ticket.generation {
            return false;
        }
        slot.state = state;
        true
    }

    fn replace(&self, state: SurfaceState) {
        let mut slot = self.lock();
        slot.generation = slot.generation.wrapping_add(1);
        slot.state = state;
    }

    fn lock(&self) -> RwLockWriteGuard<'_, Slot> {
        self.inner
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ticket-bound writer handed to render functions.
#[derive(Debug)]
pub struct SurfaceWriter<'a> {
    surface: &'a Surface,
    ticket: Ticket,
}

impl<'a> SurfaceWriter<'a> {
    pub(crate) fn new(surface: &'a Surface, ticket: Ticket) -> Self {
        Self { surface, ticket }
    }

    /// Show `panel` if the call still owns the surface.
    pub fn show(&self, panel: Panel) -> bool {
        self.surface.write(self.ticket, SurfaceState::Ready(panel))
    }

    /// Write an arbitrary state if the call still owns the surface.
    pub fn write(&self, state: SurfaceState) -> bool {
        self.surface.write(self.ticket, state)
    }

    /// The surface being written.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.surface
    }
}
