//! Pure session state machine: `Active(page)` until exactly one close.

use crate::{
    errors::Error,
    pagination::types::{CloseReason, Control, PagePosition},
    Result,
};

/// Wrapping 1-based page index over a fixed page count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
    total: usize,
}

impl PageCursor {
    pub fn new(total: usize, start: usize) -> Result<Self> {
        if total == 0 {
            return Err(Error::Precondition("at least one page is required".to_string()));
        }
        if start == 0 || start > total {
            return Err(Error::Precondition(format!(
                "start page {start} is outside 1..={total}"
            )));
        }
        Ok(Self { page: start, total })
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Zero-based index into the page list.
    pub fn index(&self) -> usize {
        self.page - 1
    }

    pub fn position(&self) -> PagePosition {
        PagePosition {
            page: self.page,
            total: self.total,
        }
    }

    pub fn previous(&mut self) -> usize {
        self.page = if self.page == 1 { self.total } else { self.page - 1 };
        self.page
    }

    pub fn next(&mut self) -> usize {
        self.page = if self.page == self.total { 1 } else { self.page + 1 };
        self.page
    }
}

/// What the controller must do after a button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Show the page at this position with live controls.
    Render(PagePosition),
    /// Delete the view; the session is now closed.
    Delete,
    /// Session already closed; nothing to do.
    Ignored,
}

/// What the controller must do when the session ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Teardown {
    /// Freeze the view on this page with disabled controls.
    FinalRender(PagePosition),
    /// Drop state without touching the view.
    Discard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active(PageCursor),
    Closed {
        reason: CloseReason,
        last: PagePosition,
    },
}

impl SessionState {
    pub fn new(total: usize, start: usize) -> Result<Self> {
        PageCursor::new(total, start).map(Self::Active)
    }

    pub fn position(&self) -> PagePosition {
        match self {
            Self::Active(cursor) => cursor.position(),
            Self::Closed { last, .. } => *last,
        }
    }

    pub fn close_reason(&self) -> Option<CloseReason> {
        match self {
            Self::Active(_) => None,
            Self::Closed { reason, .. } => Some(*reason),
        }
    }

    pub fn apply(&mut self, control: Control) -> Transition {
        let Self::Active(cursor) = self else {
            return Transition::Ignored;
        };

        match control {
            Control::Previous => {
                cursor.previous();
                Transition::Render(cursor.position())
            }
            Control::Next => {
                cursor.next();
                Transition::Render(cursor.position())
            }
            Control::Stop => {
                let last = cursor.position();
                *self = Self::Closed {
                    reason: CloseReason::Deleted,
                    last,
                };
                Transition::Delete
            }
        }
    }

    /// Close the session. Returns `None` when it was already closed, so
    /// teardown runs at most once.
    pub fn close(&mut self, reason: CloseReason) -> Option<Teardown> {
        let Self::Active(cursor) = self else {
            return None;
        };
        let last = cursor.position();
        *self = Self::Closed { reason, last };

        if reason.renders_final_page() {
            Some(Teardown::FinalRender(last))
        } else {
            Some(Teardown::Discard)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(page: usize, total: usize) -> PagePosition {
        PagePosition { page, total }
    }

    #[test]
    fn rejects_bad_bounds() {
        assert!(PageCursor::new(0, 1).is_err());
        assert!(PageCursor::new(3, 0).is_err());
        assert!(PageCursor::new(3, 4).is_err());
        assert_eq!(PageCursor::new(3, 3).unwrap().index(), 2);
    }

    #[test]
    fn previous_wraps_to_last() {
        let mut st = SessionState::new(5, 1).unwrap();
        assert_eq!(st.apply(Control::Previous), Transition::Render(pos(5, 5)));
    }

    #[test]
    fn next_wraps_to_first() {
        let mut st = SessionState::new(5, 5).unwrap();
        assert_eq!(st.apply(Control::Next), Transition::Render(pos(1, 5)));
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let mut st = SessionState::new(4, 1).unwrap();
        for _ in 0..4 {
            st.apply(Control::Next);
        }
        assert_eq!(st.position(), pos(1, 4));
    }

    #[test]
    fn single_page_stays_put() {
        let mut st = SessionState::new(1, 1).unwrap();
        assert_eq!(st.apply(Control::Next), Transition::Render(pos(1, 1)));
        assert_eq!(st.apply(Control::Previous), Transition::Render(pos(1, 1)));
    }

    #[test]
    fn stop_closes_and_later_presses_are_ignored() {
        let mut st = SessionState::new(3, 2).unwrap();
        assert_eq!(st.apply(Control::Stop), Transition::Delete);
        assert_eq!(st.close_reason(), Some(CloseReason::Deleted));
        assert_eq!(st.apply(Control::Next), Transition::Ignored);
        assert_eq!(st.position(), pos(2, 3));
        // The deadline firing afterwards must not render into a deleted view.
        assert_eq!(st.close(CloseReason::Timeout), None);
    }

    #[test]
    fn timeout_freezes_current_page_once() {
        let mut st = SessionState::new(3, 1).unwrap();
        st.apply(Control::Next);
        assert_eq!(
            st.close(CloseReason::Timeout),
            Some(Teardown::FinalRender(pos(2, 3)))
        );
        assert_eq!(st.close_reason(), Some(CloseReason::Timeout));
        assert_eq!(st.close(CloseReason::Timeout), None);
    }

    #[test]
    fn cancellation_discards_without_render() {
        let mut st = SessionState::new(3, 1).unwrap();
        assert_eq!(st.close(CloseReason::Cancelled), Some(Teardown::Discard));
    }
}
