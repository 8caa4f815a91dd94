//! Per-controller view state.

/// What a view should render for one asynchronous request.
///
/// `Loading` carries no stale payload: a view never shows the previous
/// result while a new request is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// No request has been made yet.
    Idle,
    Loading,
    Ready(T),
    /// Human-readable failure message.
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ViewState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn failed(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Idle => ViewState::Idle,
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(payload) => ViewState::Ready(f(payload)),
            ViewState::Failed(message) => ViewState::Failed(message),
        }
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}
