use std::fmt;

use crate::{domain::Snowflake, errors::Error, pagination::port::Acknowledge, Result};

/// The three pagination buttons, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    Previous,
    Stop,
    Next,
}

/// Custom IDs registered for a session's buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls {
    pub previous: String,
    pub stop: String,
    pub next: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            previous: "previous".to_string(),
            stop: "stop".to_string(),
            next: "next".to_string(),
        }
    }
}

impl Controls {
    pub fn new(
        previous: impl Into<String>,
        stop: impl Into<String>,
        next: impl Into<String>,
    ) -> Result<Self> {
        let controls = Self {
            previous: previous.into(),
            stop: stop.into(),
            next: next.into(),
        };
        controls.validate()?;
        Ok(controls)
    }

    /// Build from an ordered `[previous, stop, next]` list.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Result<Self> {
        match ids {
            [previous, stop, next] => {
                Self::new(previous.as_ref(), stop.as_ref(), next.as_ref())
            }
            _ => Err(Error::Precondition(format!(
                "expected exactly 3 control ids (previous, stop, next), got {}",
                ids.len()
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let [a, b, c] = self.ids();
        if a.is_empty() || b.is_empty() || c.is_empty() {
            return Err(Error::Precondition("control ids must be non-empty".to_string()));
        }
        if a == b || b == c || a == c {
            return Err(Error::Precondition(format!(
                "control ids must be distinct: {a}, {b}, {c}"
            )));
        }
        Ok(())
    }

    pub fn ids(&self) -> [&str; 3] {
        [&self.previous, &self.stop, &self.next]
    }

    pub fn control_for(&self, custom_id: &str) -> Option<Control> {
        if custom_id == self.previous {
            Some(Control::Previous)
        } else if custom_id == self.stop {
            Some(Control::Stop)
        } else if custom_id == self.next {
            Some(Control::Next)
        } else {
            None
        }
    }
}

/// 1-based page position reported in the footer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagePosition {
    pub page: usize,
    pub total: usize,
}

impl PagePosition {
    /// Fill `{page}` and `{max_pages}` in a footer template.
    pub fn footer(&self, template: &str) -> String {
        template
            .replace("{page}", &self.page.to_string())
            .replace("{max_pages}", &self.total.to_string())
    }
}

/// A button press delivered to a session.
pub struct ButtonEvent {
    pub control_id: String,
    /// Guild the interaction originated from; `None` outside guilds.
    pub guild_id: Option<Snowflake>,
    ack: Option<Box<dyn Acknowledge>>,
}

impl ButtonEvent {
    pub fn new(control_id: impl Into<String>, guild_id: Option<Snowflake>) -> Self {
        Self {
            control_id: control_id.into(),
            guild_id,
            ack: None,
        }
    }

    pub fn with_ack(mut self, ack: impl Acknowledge + 'static) -> Self {
        self.ack = Some(Box::new(ack));
        self
    }

    /// Acknowledge the interaction. Failures are logged and dropped.
    pub async fn acknowledge(&self) {
        let Some(ack) = &self.ack else {
            return;
        };
        if let Err(e) = ack.acknowledge().await {
            tracing::debug!(control = %self.control_id, error = %e, "acknowledge failed");
        }
    }
}

impl fmt::Debug for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonEvent")
            .field("control_id", &self.control_id)
            .field("guild_id", &self.guild_id)
            .field("has_ack", &self.ack.is_some())
            .finish()
    }
}

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// Stop button pressed; the view was deleted.
    Deleted,
    /// Deadline reached.
    Timeout,
    /// Deletion signalled from outside the session.
    Cancelled,
    /// Every event sender was dropped.
    SourceClosed,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::SourceClosed => "source_closed",
        }
    }

    /// Whether the view still exists and should be frozen with disabled
    /// controls.
    pub fn renders_final_page(self) -> bool {
        matches!(self, Self::Timeout | Self::SourceClosed)
    }
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    pub reason: CloseReason,
    pub last: PagePosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ids_requires_three_distinct() {
        assert!(Controls::from_ids(&["a", "b"]).is_err());
        assert!(Controls::from_ids(&["a", "b", "c", "d"]).is_err());
        assert!(Controls::from_ids(&["a", "a", "c"]).is_err());
        assert!(Controls::from_ids(&["a", "", "c"]).is_err());

        let c = Controls::from_ids(&["back", "close", "fwd"]).unwrap();
        assert_eq!(c.control_for("back"), Some(Control::Previous));
        assert_eq!(c.control_for("close"), Some(Control::Stop));
        assert_eq!(c.control_for("fwd"), Some(Control::Next));
        assert_eq!(c.control_for("other"), None);
    }

    #[test]
    fn footer_template() {
        let pos = PagePosition { page: 2, total: 7 };
        assert_eq!(pos.footer("Page {page}/{max_pages}"), "Page 2/7");
        assert_eq!(pos.footer("no placeholders"), "no placeholders");
    }
}
