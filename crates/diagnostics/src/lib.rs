//! Lightweight, configurable logging for the nametree workspace.
//!
//! Usage:
//! - Set NAMETREE_LOG=off (default) - no logs
//! - Set NAMETREE_LOG=info - basic operation logs
//! - Set NAMETREE_LOG=debug - detailed diagnostic logs

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the NAMETREE_LOG environment variable.
///
/// This should be called once at application startup. It's safe to call
/// multiple times - subsequent calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("NAMETREE_LOG").unwrap_or_else(|_| "off".to_string());

        let rt = match log_level.as_str() {
            "off" => return,
            "debug" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Debug))
                .init(),
            "info" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Info))
                .init(),
            "warn" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Warn))
                .init(),
            "error" => emit::setup()
                .emit_to(emit_term::stderr())
                .emit_when(emit::level::min_filter(emit::Level::Error))
                .init(),
            _ => {
                let rt = emit::setup()
                    .emit_to(emit_term::stderr())
                    .emit_when(emit::level::min_filter(emit::Level::Info))
                    .init();
                eprintln!(
                    "Warning: Unknown NAMETREE_LOG value '{}', using 'info'",
                    log_level
                );
                rt
            }
        };

        // The emit runtime must outlive every logging call site.
        std::mem::forget(rt);
    });
}

/// Log basic operations (init, destroy, whole-tree events).
pub use emit::info as log_info;

/// Log detailed diagnostics (per-node traversal steps, internal state).
pub use emit::debug as log_debug;

/// Log warning conditions (rejected operations worth noting).
pub use emit::warn as log_warn;

/// Log invariant violations and other serious failures.
pub use emit::error as log_error;

/// Re-export the init function for convenience
pub use init_diagnostics as init;
