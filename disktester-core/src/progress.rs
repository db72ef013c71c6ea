/// Phases a run moves through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Write,
    Validate,
    Clean,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Write => "write",
            Phase::Validate => "validate",
            Phase::Clean => "clean",
        }
    }
}

/// Presentation seam: the core reports phase boundaries and per-item
/// completion; how (or whether) they are rendered is the caller's concern.
pub trait Progress {
    fn phase_started(&self, _phase: Phase, _total_items: u64) {}
    fn item_completed(&self, _phase: Phase, _index: u64) {}
    fn phase_finished(&self, _phase: Phase) {}
}

/// Silent implementation for library callers and tests.
pub struct NoProgress;

impl Progress for NoProgress {}
