#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrateStorage {
    pub from: u32,
    pub to: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Storage is current and the state was loaded from it.
    Migrated,
    /// First failure; the caller may offer a retry.
    Failed,
    /// Failed again; storage was wiped and the state reset to a clean slate.
    Discarded,
}
