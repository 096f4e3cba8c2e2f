//! Holder of the active projection
//!
//! A [`ProjectionRegistry`] owns the one live projection of an application and
//! tells interested parties when it changes. It is an ordinary value: create
//! one and pass it (usually in an `Arc`) to whatever needs it.
//!
//! # Rules
//!
//! - The registry starts uninitialized. The first projection published fixes
//!   the projection *kind* for the registry's lifetime; later projections of a
//!   different kind are rejected and the active projection is left alone.
//! - Publishing swaps the reference and then notifies every listener with the
//!   previous projection, all inside one critical section. Readers calling
//!   [`ProjectionRegistry::current`] always see a whole projection.
//! - Listeners are notified most-recently-registered first (see
//!   [`ListenerList`]).
//! - A listener must not publish a projection or register listeners while
//!   being notified; such calls fail with
//!   [`ProjectionError::ReentrantTransition`].

use log::{debug, trace, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use crate::config::ProjectionConfig;
use crate::coordinates::SpatialPoint;
use crate::errors::{ProjectionError, Result};
use crate::projection::{MapProjection, Projection, ProjectionKind};

/// Receiver of projection change notifications
pub trait ProjectionListener: Send + Sync {
    /// Called after the active projection changed; `old` is `None` on the first change
    fn projection_changed(&self, old: Option<&Projection>);
}

impl<F> ProjectionListener for F
where
    F: Fn(Option<&Projection>) + Send + Sync,
{
    fn projection_changed(&self, old: Option<&Projection>) {
        self(old)
    }
}

/// Handle returned when a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered list of listeners with last-in, first-out delivery
///
/// Notifications go to the most recently added listener first and to the
/// oldest listener last. Layered consumers rely on this: a view registered on
/// top of another reacts before the view underneath it.
#[derive(Default)]
pub struct ListenerList {
    next_id: u64,
    entries: Vec<(ListenerId, Arc<dyn ProjectionListener>)>,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it will be notified before all existing ones
    pub fn add(&mut self, listener: Arc<dyn ProjectionListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener, returning whether it was present
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deliver `old` to every listener, newest first
    pub fn notify(&self, old: Option<&Projection>) {
        for (id, listener) in self.entries.iter().rev() {
            trace!("Notifying projection listener {:?}", id);
            listener.projection_changed(old);
        }
    }
}

/// Marks the current thread as delivering notifications until dropped
struct NotifyingGuard<'a> {
    slot: &'a Mutex<Option<ThreadId>>,
}

impl<'a> NotifyingGuard<'a> {
    fn enter(slot: &'a Mutex<Option<ThreadId>>) -> Self {
        *lock(slot) = Some(thread::current().id());
        NotifyingGuard { slot }
    }
}

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        *lock(self.slot) = None;
    }
}

/// Lock a mutex, recovering the data if a listener panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The single active projection plus its change listeners
#[derive(Default)]
pub struct ProjectionRegistry {
    /// Published projection; written only while `transition` is held
    current: RwLock<Option<Arc<Projection>>>,
    /// Serializes transitions and owns the listeners
    transition: Mutex<ListenerList>,
    /// Thread currently delivering notifications, if any
    notifying: Mutex<Option<ThreadId>>,
}

impl ProjectionRegistry {
    /// An uninitialized registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry already holding `projection`
    pub fn with_projection(projection: Projection) -> Self {
        let registry = Self::new();
        *registry
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(projection));
        registry
    }

    /// The active projection, if any
    pub fn current(&self) -> Option<Arc<Projection>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Kind of the active projection, if any
    pub fn kind(&self) -> Option<ProjectionKind> {
        self.current().map(|p| p.kind())
    }

    fn check_not_notifying(&self) -> Result<()> {
        if *lock(&self.notifying) == Some(thread::current().id()) {
            return Err(ProjectionError::ReentrantTransition);
        }
        Ok(())
    }

    /// Register a listener for projection changes
    pub fn add_listener(&self, listener: Arc<dyn ProjectionListener>) -> Result<ListenerId> {
        self.check_not_notifying()?;
        Ok(lock(&self.transition).add(listener))
    }

    /// Unregister a listener, returning whether it was registered
    pub fn remove_listener(&self, id: ListenerId) -> Result<bool> {
        self.check_not_notifying()?;
        Ok(lock(&self.transition).remove(id))
    }

    /// Publish a new projection and notify listeners
    ///
    /// Returns the projection that was replaced. A projection of a different
    /// kind than the active one is rejected with
    /// [`ProjectionError::TypeMismatch`] and nothing changes.
    pub fn set_projection(&self, projection: Projection) -> Result<Option<Arc<Projection>>> {
        self.check_not_notifying()?;

        let listeners = lock(&self.transition);

        let old = {
            let mut current = self
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(active) = current.as_ref() {
                if active.kind() != projection.kind() {
                    warn!(
                        "Rejected projection change from {} to {}",
                        active.kind(),
                        projection.kind()
                    );
                    return Err(ProjectionError::TypeMismatch {
                        current: active.kind(),
                        requested: projection.kind(),
                    });
                }
            }
            current.replace(Arc::new(projection))
        };

        debug!(
            "Projection changed, notifying {} listener(s)",
            listeners.len()
        );
        {
            let _guard = NotifyingGuard::enter(&self.notifying);
            listeners.notify(old.as_deref());
        }

        Ok(old)
    }

    /// Publish a projection of the active kind centered on `center`
    pub fn recenter(
        &self,
        center: SpatialPoint,
        config: &ProjectionConfig,
    ) -> Result<Option<Arc<Projection>>> {
        let active = self
            .current()
            .ok_or(ProjectionError::NoActiveProjection)?;
        self.set_projection(active.recentered(center, config))
    }
}
