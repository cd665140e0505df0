//! State file loading and persistence
//!
//! The CLI administers a ledger persisted as JSON: a format-tagged snapshot
//! plus the role table that governs its privileged operations. Snapshots are
//! migrated to the current format on load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use lib_ledger::{restore, snapshot, AuthoritySet, Ledger, LedgerSnapshot};

use crate::error::{CliError, CliResult};

/// On-disk document: the ledger snapshot and its role table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    pub ledger: LedgerSnapshot,
    pub roles: AuthoritySet,
}

/// Load and verify a state file, returning the live ledger and role table
pub fn load(path: &Path) -> CliResult<(Ledger, AuthoritySet)> {
    if !path.exists() {
        return Err(CliError::StateNotFound(path.to_path_buf()));
    }
    let raw = fs::read_to_string(path)?;
    let file: StateFile = serde_json::from_str(&raw)?;
    // restore() migrates the snapshot to the current format first
    let ledger = restore(file.ledger)?;
    Ok((ledger, file.roles))
}

/// Capture and persist the ledger and role table
pub fn save(path: &Path, ledger: &Ledger, roles: &AuthoritySet) -> CliResult<()> {
    let file = StateFile {
        ledger: snapshot(ledger),
        roles: roles.clone(),
    };
    let encoded = serde_json::to_string_pretty(&file)?;
    fs::write(path, encoded)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_ledger::RecordingSink;
    use lib_types::Address;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");

        let holder = Address::new([1u8; 32]);
        let mut ledger = Ledger::new();
        ledger
            .initialize(holder, &mut RecordingSink::new())
            .unwrap();
        let mut roles = AuthoritySet::new();
        roles.grant(lib_ledger::Role::Admin, holder);

        save(&path, &ledger, &roles).unwrap();
        let (restored, restored_roles) = load(&path).unwrap();

        assert_eq!(restored.balance_of(&holder), ledger.balance_of(&holder));
        assert!(restored_roles.has_role(lib_ledger::Role::Admin, &holder));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(CliError::StateNotFound(_))));
    }

    #[test]
    fn corrupted_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatha-state.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(CliError::Malformed(_))));
    }
}
