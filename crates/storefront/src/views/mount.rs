//! View mount lifecycle.
//!
//! A [`Mount`] owns the state of one live view. Asynchronous work started by
//! the view only ever holds a [`Scope`], a weak handle to that state. Once
//! the mount is dropped every scope goes dead, and results that arrive
//! afterwards are discarded instead of being written into state nobody owns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Owner of a view's state.
#[derive(Debug)]
pub struct Mount<T> {
    state: Arc<Mutex<T>>,
}

/// Weak handle to a mounted view's state.
#[derive(Debug)]
pub struct Scope<T> {
    state: Weak<Mutex<T>>,
}

impl<T> Clone for Scope<T> {
    fn clone(&self) -> Self {
        Self {
            state: Weak::clone(&self.state),
        }
    }
}

impl<T> Mount<T> {
    pub fn new(state: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Hand out a weak handle for asynchronous work.
    #[must_use]
    pub fn scope(&self) -> Scope<T> {
        Scope {
            state: Arc::downgrade(&self.state),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.state))
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut lock(&self.state))
    }
}

impl<T> Scope<T> {
    /// Apply `f` if the view is still mounted.
    ///
    /// Returns `None` without calling `f` once the mount is gone.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let state = self.state.upgrade()?;
        let result = f(&mut lock(&state));
        Some(result)
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.strong_count() > 0
    }
}

// State updates are plain assignments; a panic mid-update cannot leave the
// state half-written in a way later readers care about.
fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
