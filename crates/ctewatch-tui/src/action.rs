use ctewatch_core::{CycleReport, Surface};

/// Every state change in the TUI goes through an `Action`.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ───────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data ────────────────────────────────────────────────────────
    /// One finished poll cycle.
    Cycle(Box<CycleReport>),
    /// Debounced chart surface change after a terminal resize.
    SurfaceResized(Surface),

    // ── Overlays ────────────────────────────────────────────────────
    ToggleHelp,
}
