use std::{
    fmt, fs,
    io::{self, Write},
    path::Path,
};

use log::debug;
use strum::{EnumCount, VariantArray};

use crate::{
    error::{IllegalAction, InvalidTable, StorageError},
    state::{is_legal, legal_actions, Action, BatteryState},
};

/// Starting estimate for every reachable state-action pair
pub const INITIAL_VALUE: f64 = 1.0;

/// Size in bytes of a stored table: row-major `f64`s, little-endian
pub const ENCODED_LEN: usize = BatteryState::COUNT * Action::COUNT * std::mem::size_of::<f64>();

type Rows = [[f64; Action::COUNT]; BatteryState::COUNT];

/// Action-value estimates for every (battery state, action) pair
///
/// The `High x Recharge` cell is not a real state-action pair. It is held at `0.0`
/// and every accessor refuses to read or write it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTable {
    values: Rows,
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueTable {
    /// A table with every legal entry set to [`INITIAL_VALUE`]
    pub fn new() -> Self {
        let mut values = [[INITIAL_VALUE; Action::COUNT]; BatteryState::COUNT];
        values[BatteryState::High.index()][Action::Recharge.index()] = 0.0;
        Self { values }
    }

    /// Build a table from raw rows (`Low` then `High`; columns `Search`, `Wait`, `Recharge`)
    ///
    /// **Errors** if any value is not finite or the `High x Recharge` cell is not `0.0`
    pub fn from_rows(values: Rows) -> Result<Self, InvalidTable> {
        if let Some(&v) = values.iter().flatten().find(|v| !v.is_finite()) {
            return Err(InvalidTable::NonFinite(v));
        }
        let masked = values[BatteryState::High.index()][Action::Recharge.index()];
        if masked != 0.0 {
            return Err(InvalidTable::MaskedCell(masked));
        }
        Ok(Self { values })
    }

    pub fn rows(&self) -> &Rows {
        &self.values
    }

    /// The estimate for taking `action` in `state`
    pub fn get(&self, state: BatteryState, action: Action) -> Result<f64, IllegalAction> {
        if !is_legal(state, action) {
            return Err(IllegalAction { state, action });
        }
        Ok(self.values[state.index()][action.index()])
    }

    /// Add `delta` to the estimate for taking `action` in `state`
    pub fn update(
        &mut self,
        state: BatteryState,
        action: Action,
        delta: f64,
    ) -> Result<(), IllegalAction> {
        if !is_legal(state, action) {
            return Err(IllegalAction { state, action });
        }
        self.values[state.index()][action.index()] += delta;
        Ok(())
    }

    /// Legal actions of `state` paired with their estimates
    fn legal_values(&self, state: BatteryState) -> impl Iterator<Item = (Action, f64)> + '_ {
        let row = &self.values[state.index()];
        legal_actions(state).iter().map(move |&a| (a, row[a.index()]))
    }

    /// The largest estimate among the legal actions of `state`
    pub fn max_legal(&self, state: BatteryState) -> f64 {
        self.legal_values(state)
            .map(|(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every legal action of `state` whose estimate equals [`max_legal`](Self::max_legal)
    pub fn greedy_actions(&self, state: BatteryState) -> Vec<Action> {
        let best = self.max_legal(state);
        self.legal_values(state)
            .filter(|&(_, v)| v == best)
            .map(|(a, _)| a)
            .collect()
    }

    /// The learned deterministic policy: the best legal action, ties going to the earlier action
    pub fn greedy_action(&self, state: BatteryState) -> Action {
        // `greedy_actions` is never empty: every legal set is non-empty and values are finite
        self.greedy_actions(state)
            .first()
            .copied()
            .unwrap_or(legal_actions(state)[0])
    }

    /// Write the table to `path` as 6 little-endian `f64`s in row-major order
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        let path = path.as_ref();
        let bytes = bincode::serialize(&self.values)?;
        let mut file = io::BufWriter::new(fs::File::create(path)?);
        file.write_all(&bytes)?;
        file.flush()?;
        debug!("Saved value table to {}", path.display());
        Ok(())
    }

    /// Read a table previously written by [`save`](Self::save)
    ///
    /// There is no fallback to a fresh table; a missing file is [`StorageError::NotFound`]
    /// and anything that does not decode to a valid table is [`StorageError::Corrupt`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
            _ => StorageError::Io(e),
        })?;
        let corrupt = |reason: String| StorageError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.len() != ENCODED_LEN {
            return Err(corrupt(format!(
                "expected {ENCODED_LEN} bytes, found {}",
                bytes.len()
            )));
        }
        let values: Rows = bincode::deserialize(&bytes).map_err(|e| corrupt(e.to_string()))?;
        let table = Self::from_rows(values).map_err(|e| corrupt(e.to_string()))?;
        debug!("Loaded value table from {}", path.display());
        Ok(table)
    }
}

impl fmt::Display for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for action in Action::VARIANTS {
            write!(f, "{:>10}", action.to_string())?;
        }
        for state in BatteryState::VARIANTS {
            write!(f, "\n{:>6}", state.to_string())?;
            for action in Action::VARIANTS {
                match self.get(*state, *action) {
                    Ok(v) => write!(f, "{v:>10.4}")?,
                    Err(_) => write!(f, "{:>10}", "-")?,
                }
            }
        }
        Ok(())
    }
}
