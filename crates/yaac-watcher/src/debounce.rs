//! Debounced re-scan loop.
//!
//! Every event pushes a single deadline `delay` into the future. When the
//! deadline passes with no further events, one cycle runs and is awaited
//! before the loop looks at the channel again, so cycles never overlap.
//! Events that arrive during a cycle wait in the channel and arm the next
//! deadline afterwards. Under a steady stream of events the cycle is
//! deferred indefinitely.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::watcher::WatchEvent;

/// Quiet period required before a re-scan.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Runs `cycle` once per burst of events until `cancel` fires or the
/// event channel closes. Returns the number of cycles started.
///
/// A failing cycle is logged and the loop keeps going.
pub async fn debounce_cycles<F, Fut, T, E>(
    events: &mut UnboundedReceiver<WatchEvent>,
    delay: Duration,
    cancel: &CancellationToken,
    mut cycle: F,
) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut deadline: Option<Instant> = None;
    let mut cycles = 0;

    loop {
        let armed = deadline;
        let quiet = async move {
            match armed {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("Watch loop cancelled");
                break;
            }

            event = events.recv() => match event {
                Some(event) => {
                    info!("{}", event);
                    deadline = Some(Instant::now() + delay);
                }
                None => break,
            },

            _ = quiet => {
                deadline = None;
                cycles += 1;
                if let Err(e) = cycle().await {
                    error!("Error during scan: {}", e);
                }
            }
        }
    }

    cycles
}
