use crate::error::Result;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Persisted ledger state: resource quantities and accumulated earnings.
///
/// Startup tolerates both a missing and a malformed snapshot file: the first
/// is a clean start, the second is reported and the built-in defaults are
/// kept. Neither may corrupt the live ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineState {
    pub resources: IndexMap<String, u32>,
    pub earnings: Decimal,
}

impl MachineState {
    /// Reads a snapshot. A missing file is `Ok(None)`; an unreadable or
    /// malformed one is an error the caller decides how to report.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let state = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(state))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        info!(path = %path.display(), "machine state saved");
        Ok(())
    }
}
