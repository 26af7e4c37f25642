//! Change gate: suppresses update notifications when the tracked value set
//! is unchanged since the last report.

use motiva_api_core::ValueMap;

/// Last value mapping reported for a node. Lives for the life of the node
/// and is destroyed with it.
#[derive(Clone, Debug, Default)]
pub struct ChangeGate {
    last_reported: ValueMap,
}

impl ChangeGate {
    /// Seed the snapshot without reporting, e.g. at mount.
    pub fn seed(&mut self, values: ValueMap) {
        self.last_reported = values;
    }

    /// Compare the current full mapping against the last report. Returns
    /// true (and updates the snapshot) only when the set differs by key or
    /// by value.
    pub fn observe(&mut self, values: &ValueMap) -> bool {
        if *values == self.last_reported {
            return false;
        }
        self.last_reported = values.clone();
        true
    }
}
