//! stdin/stdout stand-ins for a chat message and its buttons.

use std::io::BufRead;

use async_trait::async_trait;
use tokio::{
    io::{self, AsyncWriteExt, Stdout},
    sync::{mpsc, Mutex},
};

use refkit_core::{
    domain::Snowflake,
    pagination::{port::PageView, ButtonEvent, Controls, PagePosition, SessionHandle},
    Result,
};

/// Prints each render as a framed block with a footer and button row.
pub struct TerminalView {
    footer_template: String,
    controls: Controls,
    out: Mutex<Stdout>,
}

impl TerminalView {
    pub fn new(footer_template: String, controls: Controls) -> Self {
        Self {
            footer_template,
            controls,
            out: Mutex::new(io::stdout()),
        }
    }

    async fn write(&self, text: &str) -> Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl PageView<String> for TerminalView {
    async fn render(
        &self,
        page: &String,
        position: PagePosition,
        controls_enabled: bool,
    ) -> Result<()> {
        let buttons = if controls_enabled {
            let [prev, stop, next] = self.controls.ids();
            format!("[{prev}] [{stop}] [{next}]")
        } else {
            "(controls disabled)".to_string()
        };

        self.write(&format!(
            "\n----------------------------------------\n{page}\n-- {} --\n{buttons}\n",
            position.footer(&self.footer_template)
        ))
        .await
    }

    async fn delete(&self) -> Result<()> {
        self.write("\n(message deleted)\n").await
    }
}

/// Maps short commands onto the session's control IDs; anything else is
/// passed through verbatim.
fn control_id_for(line: &str, controls: &Controls) -> String {
    match line {
        "p" | "prev" => controls.previous.clone(),
        "s" => controls.stop.clone(),
        "n" => controls.next.clone(),
        other => other.to_string(),
    }
}

fn event_for(line: &str, controls: &Controls, guild_id: Option<Snowflake>) -> Option<ButtonEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ButtonEvent::new(control_id_for(trimmed, controls), guild_id))
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Feed stdin lines to the session until it closes or stdin hits EOF.
pub async fn drive_from_stdin(
    handle: &SessionHandle,
    controls: &Controls,
    guild_id: Option<Snowflake>,
) -> Result<()> {
    let sender = handle.sender();
    let mut lines = spawn_stdin_reader();

    loop {
        tokio::select! {
            _ = sender.closed() => return Ok(()),
            line = lines.recv() => {
                let Some(line) = line else {
                    return Ok(());
                };
                let Some(event) = event_for(&line?, controls, guild_id) else {
                    continue;
                };
                if !handle.press(event) {
                    return Ok(());
                }
            }
        }
    }
}

/// Stdin lines as chat messages. Ends at EOF or on a read error.
pub fn stdin_messages() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut lines = spawn_stdin_reader();

    tokio::spawn(async move {
        while let Some(line) = lines.recv().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    rx
}

/// Stdin lines as a stream of button events.
pub fn stdin_events(
    controls: Controls,
    guild_id: Option<Snowflake>,
) -> mpsc::UnboundedReceiver<ButtonEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut messages = stdin_messages();

    tokio::spawn(async move {
        while let Some(line) = messages.recv().await {
            if let Some(event) = event_for(&line, &controls, guild_id) {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_map_to_configured_ids() {
        let controls = Controls::new("back", "close", "fwd").unwrap();
        assert_eq!(control_id_for("p", &controls), "back");
        assert_eq!(control_id_for("s", &controls), "close");
        assert_eq!(control_id_for("n", &controls), "fwd");
        assert_eq!(control_id_for("fwd", &controls), "fwd");
        assert_eq!(control_id_for("jump", &controls), "jump");
    }

    #[test]
    fn blank_lines_are_not_presses() {
        let controls = Controls::default();
        assert!(event_for("   ", &controls, None).is_none());

        let guild = Some(Snowflake(1));
        let ev = event_for(" n \n", &controls, guild).unwrap();
        assert_eq!(ev.control_id, "next");
        assert_eq!(ev.guild_id, guild);
    }
}
