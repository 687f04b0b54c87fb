//! Helpers that end a blocking run from another thread.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::{Phase, Serv, ServeError, Service};

const WAIT_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Spawns a thread that runs `action` once `serv` is waiting or has finished.
///
/// If neither happens before the timeout the action still runs, followed by a
/// force stop, so a misbehaving run cannot hang the suite.
pub fn when_waiting<F>(serv: &Arc<Serv>, action: F) -> thread::JoinHandle<bool>
where
    F: FnOnce() + Send + 'static,
{
    let serv = Arc::clone(serv);
    thread::spawn(move || {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        let mut reached_waiting = false;
        while Instant::now() < deadline {
            match serv.phase() {
                Phase::Waiting => {
                    reached_waiting = true;
                    break;
                }
                Phase::Done => break,
                _ => thread::sleep(POLL_INTERVAL),
            }
        }
        action();
        if Instant::now() >= deadline {
            serv.force_stop();
        }
        reached_waiting
    })
}

/// Serves `services` while a helper thread runs `action` once waiting starts.
///
/// Returns the run outcome and whether the run was observed in `Waiting`.
pub fn serve_then<F>(
    serv: &Arc<Serv>,
    services: &mut [&mut dyn Service],
    action: F,
) -> (Result<(), ServeError>, bool)
where
    F: FnOnce() + Send + 'static,
{
    let stopper = when_waiting(serv, action);
    let outcome = serv.serve(services);
    let reached_waiting = stopper.join().expect("stopper thread panicked");
    (outcome, reached_waiting)
}
