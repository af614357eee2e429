//! Progress spinner shown while a request is outstanding

use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated indicator on stderr; stops when dropped.
///
/// When stderr is not a terminal the message is printed once instead.
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
    animated: bool,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        let message = message.into();

        if !io::stderr().is_terminal() {
            eprintln!("{}", message);
            return Self {
                stop_tx: None,
                handle: None,
                animated: false,
            };
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::animate(message, stop_rx));

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            animated: true,
        }
    }

    fn stop_internal(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            // Can't await in Drop
            handle.abort();
        }
        if self.animated {
            Self::clear_line();
        }
    }

    async fn animate(message: String, mut stop_rx: oneshot::Receiver<()>) {
        let mut stderr = io::stderr();

        for frame in FRAMES.iter().cycle() {
            let _ = write!(stderr, "\r{} {}", frame, message);
            let _ = stderr.flush();

            tokio::select! {
                _ = tokio::time::sleep(FRAME_INTERVAL) => {},
                _ = &mut stop_rx => break,
            }
        }

        Self::clear_line();
    }

    fn clear_line() {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "\r\x1b[K");
        let _ = stderr.flush();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop_internal();
    }
}

/// Await `future` with a spinner showing `message`
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}
