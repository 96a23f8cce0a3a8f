//! Stops a running suite on SIGINT/SIGTERM.

use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;

use signal_hook::consts::SIGINT;
use signal_hook::consts::SIGTERM;
use signal_hook::iterator::Signals;
use tracing::warn;

use crate::usecases::AbortHandle;

pub struct SignalHandler {
    _handle: JoinHandle<()>,
}

impl SignalHandler {
    /// The first signal aborts the run after the in-flight cases finish.
    pub fn setup(abort: &AbortHandle) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        let flag = abort.flag();

        let handle = thread::Builder::new()
            .name("signal-handler".to_string())
            .spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    warn!(signal = sig, "Received signal, stopping after current cases");
                    flag.store(true, Ordering::SeqCst);
                }
            })?;

        Ok(Self { _handle: handle })
    }
}
