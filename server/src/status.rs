pub mod api;

/// Default status applied when a task is created without one.
pub const DEFAULT_STATUS: &str = "pending";

/// Default priority applied when a task is created without one.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Priority values offered by the UI, lowest first.
pub const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

/// Display metadata for a task status.
///
/// The transition list is advisory only; nothing validates it on write. Tasks
/// carrying a status outside this catalog are still stored and listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub name: &'static str,
    pub color: &'static str,
    pub transitions_to: &'static [&'static str],
}

const STATUSES: [StatusDescriptor; 3] = [
    StatusDescriptor {
        name: "pending",
        color: "#d97706",
        transitions_to: &["in-progress", "completed"],
    },
    StatusDescriptor {
        name: "in-progress",
        color: "#2563eb",
        transitions_to: &["pending", "completed"],
    },
    StatusDescriptor {
        name: "completed",
        color: "#16a34a",
        transitions_to: &["pending"],
    },
];

/// Returns every status descriptor in catalog order.
pub fn all() -> &'static [StatusDescriptor] {
    &STATUSES
}

/// Looks up the descriptor for a status key, or `None` if it is not in the
/// catalog.
pub fn describe(name: &str) -> Option<&'static StatusDescriptor> {
    STATUSES.iter().find(|descriptor| descriptor.name == name)
}
