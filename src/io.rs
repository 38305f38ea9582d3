use std::path::Path;

use log::debug;

use crate::error::StorageError;

/// Write one total reward per line, in epoch order
pub fn write_reward_log<P: AsRef<Path>>(path: P, rewards: &[f64]) -> Result<(), StorageError> {
    let path = path.as_ref();
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for reward in rewards {
        wtr.write_record([reward.to_string()])?;
    }
    wtr.flush()?;
    debug!("Wrote {} rewards to {}", rewards.len(), path.display());
    Ok(())
}

/// Read a reward log written by [`write_reward_log`]
pub fn read_reward_log<P: AsRef<Path>>(path: P) -> Result<Vec<f64>, StorageError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    rdr.records()
        .enumerate()
        .map(|(line, record)| {
            let record = record?;
            let field = record.get(0).unwrap_or_default().trim();
            field
                .parse::<f64>()
                .map_err(|e| StorageError::RewardLog(format!("line {}: {e}", line + 1)))
        })
        .collect()
}
