//! Interrupt handling.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Returns a flag that is set on SIGINT or SIGTERM.
///
/// The builder checks it between charts, so the in-flight chart finishes and
/// the store is saved before exit. Repeated signals only set the flag again; a
/// render that never returns has to be stopped with SIGKILL.
pub fn interrupt_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use tracing::warn;

        for sig in [SIGINT, SIGTERM] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&flag)) {
                warn!("Failed to register signal handler: {}", e);
            }
        }
    }

    flag
}
