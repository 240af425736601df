//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit UI interaction logs (button presses, view resets).
    pub print_ui_interactions: bool,
    /// Emit a line each time the shared time axis is republished.
    pub print_axis_link_updates: bool,
    /// Emit cache hit/miss diagnostics from the series cache.
    pub print_cache_events: bool,
    /// Emit details of UI state serialization/deserialization logs.
    pub print_state_serde: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_ui_interactions: true,
    print_axis_link_updates: false,
    print_cache_events: false,
    print_state_serde: false,
    print_shutdown: false,
};
