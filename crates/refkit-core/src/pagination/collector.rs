//! Event filtering and bounded waits for components or messages.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    domain::Snowflake,
    pagination::types::{ButtonEvent, Control, Controls},
};

/// Accepts only the session's own buttons, pressed inside the session's
/// guild. Presses outside any guild are always rejected.
#[derive(Clone, Debug)]
pub struct EventFilter {
    controls: Controls,
    guild_id: Option<Snowflake>,
}

impl EventFilter {
    pub fn new(controls: Controls, guild_id: Option<Snowflake>) -> Self {
        Self { controls, guild_id }
    }

    pub fn accepts(&self, event: &ButtonEvent) -> Option<Control> {
        if event.guild_id.is_none() || event.guild_id != self.guild_id {
            return None;
        }
        self.controls.control_for(&event.control_id)
    }
}

/// Wait for the first event passing `filter`.
///
/// `timeout` bounds the whole wait, not the gap between events. Returns
/// `None` on timeout or when the source closes.
pub async fn await_component<F>(
    events: &mut UnboundedReceiver<ButtonEvent>,
    filter: F,
    timeout: Duration,
) -> Option<ButtonEvent>
where
    F: Fn(&ButtonEvent) -> bool,
{
    let wait = async {
        while let Some(event) = events.recv().await {
            if filter(&event) {
                return Some(event);
            }
            tracing::trace!(control = %event.control_id, "component filtered out");
        }
        None
    };

    tokio::time::timeout(timeout, wait).await.ok().flatten()
}

pub const DEFAULT_MAX_MESSAGES: usize = 1;

/// Collect up to `max` items passing `filter`.
///
/// Running out of time before `max` items arrive yields an empty list; the
/// partial batch is dropped. A closed source returns whatever was collected.
pub async fn await_messages<T, F>(
    events: &mut UnboundedReceiver<T>,
    filter: F,
    max: usize,
    timeout: Duration,
) -> Vec<T>
where
    F: Fn(&T) -> bool,
{
    if max == 0 {
        return Vec::new();
    }

    let collect = async {
        let mut batch = Vec::with_capacity(max);
        while let Some(item) = events.recv().await {
            if !filter(&item) {
                continue;
            }
            batch.push(item);
            if batch.len() == max {
                break;
            }
        }
        batch
    };

    match tokio::time::timeout(timeout, collect).await {
        Ok(batch) => batch,
        Err(_) => {
            tracing::debug!(max, "message wait timed out");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const GUILD: Snowflake = Snowflake(900000000000000000);

    #[test]
    fn filter_checks_guild_and_id() {
        let f = EventFilter::new(Controls::default(), Some(GUILD));
        assert_eq!(
            f.accepts(&ButtonEvent::new("next", Some(GUILD))),
            Some(Control::Next)
        );
        assert_eq!(f.accepts(&ButtonEvent::new("next", Some(Snowflake(1)))), None);
        assert_eq!(f.accepts(&ButtonEvent::new("next", None)), None);
        assert_eq!(f.accepts(&ButtonEvent::new("jump", Some(GUILD))), None);
    }

    #[test]
    fn filter_without_guild_rejects_everything() {
        let f = EventFilter::new(Controls::default(), None);
        assert_eq!(f.accepts(&ButtonEvent::new("next", None)), None);
        assert_eq!(f.accepts(&ButtonEvent::new("next", Some(GUILD))), None);
    }

    #[tokio::test(start_paused = true)]
    async fn await_component_skips_rejected_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(ButtonEvent::new("nope", None)).unwrap();
        tx.send(ButtonEvent::new("yes", None)).unwrap();

        let got = await_component(&mut rx, |e| e.control_id == "yes", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(got.control_id, "yes");
    }

    #[tokio::test(start_paused = true)]
    async fn await_component_times_out() {
        let (_tx, mut rx) = mpsc::unbounded_channel();
        let got = await_component(&mut rx, |_| true, Duration::from_secs(60)).await;
        assert!(got.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn await_messages_stops_at_max() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for line in ["hi", "", "there", "extra"] {
            tx.send(line.to_string()).unwrap();
        }

        let non_empty = |m: &String| !m.is_empty();
        let got = await_messages(&mut rx, non_empty, 2, Duration::from_secs(60)).await;
        assert_eq!(got, vec!["hi", "there"]);
        // Items past `max` stay queued for the next reader.
        assert_eq!(rx.recv().await.as_deref(), Some("extra"));
    }

    #[tokio::test(start_paused = true)]
    async fn await_messages_timeout_drops_partial_batch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send("only one".to_string()).unwrap();

        let got = await_messages(&mut rx, |_| true, 2, Duration::from_secs(60)).await;
        assert!(got.is_empty());
        drop(tx);
    }

    #[tokio::test]
    async fn await_messages_returns_partial_batch_when_source_closes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(1u32).unwrap();
        drop(tx);

        let got = await_messages(&mut rx, |_| true, 3, Duration::from_secs(60)).await;
        assert_eq!(got, vec![1]);
    }

    #[tokio::test]
    async fn await_messages_with_zero_max_is_empty() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.send(1u32).unwrap();
        let got = await_messages(&mut rx, |_| true, 0, Duration::from_secs(60)).await;
        assert!(got.is_empty());
        assert_eq!(rx.recv().await, Some(1));
    }

    #[tokio::test]
    async fn await_component_ends_when_source_closes() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ButtonEvent>();
        drop(tx);
        let got = await_component(&mut rx, |_| true, Duration::from_secs(60)).await;
        assert!(got.is_none());
    }
}
