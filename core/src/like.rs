//! Like/unlike state as seen by the caller.
//!
//! The flip is deferred, not optimistic: `LikeToggle` only moves to the new
//! state once the server has confirmed it, and a failed request leaves the
//! state exactly as it was. There is no pending state. Two taps before the
//! first response arrives send two requests, and whichever result is settled
//! last decides the final state.

/// Which endpoint the caller is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    /// State reached once this action is confirmed.
    pub fn target(self) -> LikeState {
        match self {
            LikeAction::Like => LikeState::Liked,
            LikeAction::Unlike => LikeState::Unliked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeState {
    Unliked,
    Liked,
}

impl LikeState {
    pub fn from_liked(liked: bool) -> Self {
        if liked {
            LikeState::Liked
        } else {
            LikeState::Unliked
        }
    }

    pub fn is_liked(self) -> bool {
        self == LikeState::Liked
    }

    /// Action a tap should request from this state.
    pub fn toggle_action(self) -> LikeAction {
        match self {
            LikeState::Unliked => LikeAction::Like,
            LikeState::Liked => LikeAction::Unlike,
        }
    }
}

/// Confirmed like state for one diary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    state: LikeState,
}

impl LikeToggle {
    /// Seed from the `isLiked` flag of a fetched record.
    pub fn new(liked: bool) -> Self {
        Self {
            state: LikeState::from_liked(liked),
        }
    }

    pub fn state(&self) -> LikeState {
        self.state
    }

    /// What a tap means right now. Does not change the state.
    pub fn intent(&self) -> LikeAction {
        self.state.toggle_action()
    }

    /// Apply the outcome of a like/unlike call. Only success moves the state.
    pub fn settle<T, E>(&mut self, action: LikeAction, outcome: &Result<T, E>) -> LikeState {
        if outcome.is_ok() {
            self.state = action.target();
        }
        self.state
    }
}
