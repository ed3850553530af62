//! Line commands that drive the display from a terminal.
//!
//! ```text
//! touch
//! open info|live|chat
//! close info|live|chat
//! say <text>
//! quit
//! ```

use display::{Event, MediatorHandle, Modal};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::oneshot;
use tracing::warn;

#[derive(Debug, PartialEq)]
pub enum Input {
    Event(Event),
    Quit,
}

/// Parse one console line. `None` for blank or unrecognised lines.
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let event = match word.to_ascii_lowercase().as_str() {
        "" => return None,
        "quit" | "exit" => return Some(Input::Quit),
        "touch" => Event::Touch,
        "say" => Event::UserChatSend {
            text: rest.to_string(),
        },
        "open" => Event::OpenModal(rest.parse::<Modal>().ok()?),
        "close" => Event::CloseModal(rest.parse::<Modal>().ok()?),
        _ => return None,
    };
    Some(Input::Event(event))
}

/// Forward console commands to the mediator until `quit` or end of input.
pub async fn read_commands<R>(reader: R, display: MediatorHandle, quit: oneshot::Sender<()>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "console read failed");
                break;
            }
        };
        match parse_input(&line) {
            Some(Input::Event(event)) => {
                if !display.send(event).await {
                    return;
                }
            }
            Some(Input::Quit) => break,
            None if line.trim().is_empty() => {}
            None => warn!(line, "unknown command"),
        }
    }
    let _ = quit.send(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_input(" touch "), Some(Input::Event(Event::Touch)));
        assert_eq!(
            parse_input("open live"),
            Some(Input::Event(Event::OpenModal(Modal::LiveData)))
        );
        assert_eq!(
            parse_input("say how are you"),
            Some(Input::Event(Event::UserChatSend {
                text: "how are you".into()
            }))
        );
        assert_eq!(parse_input("quit"), Some(Input::Quit));
    }

    #[test]
    fn rejects_nonsense() {
        assert_eq!(parse_input(""), None);
        assert_eq!(parse_input("open settings"), None);
        assert_eq!(parse_input("dance"), None);
    }
}
