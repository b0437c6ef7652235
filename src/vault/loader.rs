//! Load vault positions from CSV
//!
//! Expected columns: `VaultID,Owner,Amount,LockPeriod,DepositTime`

use super::VaultPosition;
use crate::amount::parse_micro_stx;
use crate::error::Result;
use crate::schedule::LockPeriod;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the positions export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "VaultID")]
    vault_id: u64,
    #[serde(rename = "Owner")]
    owner: Option<String>,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "LockPeriod")]
    lock_period: String,
    #[serde(rename = "DepositTime")]
    deposit_time: i64,
}

impl CsvRow {
    fn into_position(self) -> Result<VaultPosition> {
        let period: LockPeriod = self.lock_period.parse()?;
        let principal = parse_micro_stx(&self.amount)?;

        let mut position = VaultPosition::new(self.vault_id, principal, period, self.deposit_time);
        position.owner = self.owner.filter(|o| !o.trim().is_empty());
        Ok(position)
    }
}

/// Load all positions from a CSV file
pub fn load_positions<P: AsRef<Path>>(path: P) -> Result<Vec<VaultPosition>> {
    let path = path.as_ref();
    log::info!("Loading vault positions from {}", path.display());
    let reader = Reader::from_path(path)?;
    read_positions(reader)
}

/// Load positions from any reader (e.g., string buffer, stdin)
pub fn load_positions_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<VaultPosition>> {
    read_positions(Reader::from_reader(reader))
}

fn read_positions<R: std::io::Read>(mut csv_reader: Reader<R>) -> Result<Vec<VaultPosition>> {
    let mut positions = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let position = row.into_position()?;
        positions.push(position);
    }

    log::debug!("Loaded {} vault positions", positions.len());
    Ok(positions)
}
