//! Layout resolution from the set of enabled timers

use std::collections::BTreeMap;

use crate::state::snapshot::TimerState;

/// Overall layout derived from how many timers are currently enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// No timer enabled, nothing styled
    None,
    /// Exactly one timer enabled, shown full width
    Single,
    /// Exactly two timers enabled, shown side by side
    Dual,
}

/// Styling class applied to an individual timer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutClass {
    SingleActive,
    DualActive,
}

/// Count enabled timers and pick the layout mode.
///
/// Enablement can change at any time through the admin interface, so this is
/// recomputed on every snapshot. Counts other than one or two get no layout
/// class at all.
pub fn resolve_layout(timers: &BTreeMap<String, TimerState>) -> LayoutMode {
    match timers.values().filter(|t| t.enabled).count() {
        1 => LayoutMode::Single,
        2 => LayoutMode::Dual,
        _ => LayoutMode::None,
    }
}

/// Layout class for one timer slot under the given mode.
pub fn layout_class_for(mode: LayoutMode, timer: &TimerState) -> Option<LayoutClass> {
    if !timer.enabled {
        return None;
    }
    match mode {
        LayoutMode::Single => Some(LayoutClass::SingleActive),
        LayoutMode::Dual => Some(LayoutClass::DualActive),
        LayoutMode::None => None,
    }
}
