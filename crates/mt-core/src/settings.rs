//! Global library settings.
//!
//! [`Settings`] holds the **display precision** used when uncertainty values
//! and dimensioned quantities are rendered as text.  It is a process-wide
//! singleton accessed via a `std::sync::OnceLock`.
//!
//! Thread safety: the precision is stored behind a `Mutex` so that it can be
//! changed from any thread.  Tests that change it should use
//! [`ScopedDisplayPrecision`] so the previous value is restored.

use std::sync::{Mutex, OnceLock};

/// Process-wide settings used by the metrology-rs library.
pub struct Settings {
    /// Number of decimal places for `Display`; `None` prints the shortest
    /// representation that round-trips.
    display_precision: Mutex<Option<usize>>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            display_precision: Mutex::new(None),
        })
    }

    /// Current display precision (decimal places), if one is set.
    pub fn display_precision(&self) -> Option<usize> {
        *self
            .display_precision
            .lock()
            .expect("Settings mutex poisoned")
    }

    /// Set the number of decimal places used by `Display`.
    pub fn set_display_precision(&self, decimals: usize) {
        *self
            .display_precision
            .lock()
            .expect("Settings mutex poisoned") = Some(decimals);
    }

    /// Go back to shortest round-trip formatting.
    pub fn reset_display_precision(&self) {
        *self
            .display_precision
            .lock()
            .expect("Settings mutex poisoned") = None;
    }

    /// Format a real number according to the current display precision.
    pub fn format_real(&self, value: f64) -> String {
        match self.display_precision() {
            Some(decimals) => format!("{value:.decimals$}"),
            None => format!("{value}"),
        }
    }
}

/// RAII guard that sets the display precision and restores the previous
/// setting when dropped.
pub struct ScopedDisplayPrecision {
    previous: Option<usize>,
}

impl ScopedDisplayPrecision {
    /// Set the precision to `decimals` until the guard is dropped.
    pub fn new(decimals: usize) -> Self {
        let settings = Settings::instance();
        let previous = settings.display_precision();
        settings.set_display_precision(decimals);
        Self { previous }
    }
}

impl Drop for ScopedDisplayPrecision {
    fn drop(&mut self) {
        let settings = Settings::instance();
        match self.previous {
            Some(d) => settings.set_display_precision(d),
            None => settings.reset_display_precision(),
        }
    }
}
