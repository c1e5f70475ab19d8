//! View lifecycle states.

/// What a view renders.
///
/// A view starts in `Loading` and settles exactly once into `Ready` or
/// `Error`. There is no path back to `Loading`; a fresh load means a fresh
/// view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    /// The initial fetch failed. Carries the message shown to the user.
    Error(String),
    Ready,
}

impl ViewState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// The error message, if the view failed to load.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Settle a loading view into `Ready`.
    ///
    /// Returns false (leaving the state untouched) if the view already
    /// settled.
    pub fn ready(&mut self) -> bool {
        self.settle(Self::Ready)
    }

    /// Settle a loading view into `Error`.
    ///
    /// Returns false (leaving the state untouched) if the view already
    /// settled.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        self.settle(Self::Error(message.into()))
    }

    fn settle(&mut self, next: Self) -> bool {
        if !self.is_loading() {
            return false;
        }
        *self = next;
        true
    }
}

/// Whether the cart panel is shown. Changed only by user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartVisibility(bool);

impl CartVisibility {
    #[must_use]
    pub const fn hidden() -> Self {
        Self(false)
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.0
    }

    /// Flip visibility, returning the new value.
    pub const fn toggle(&mut self) -> bool {
        self.0 = !self.0;
        self.0
    }
}
