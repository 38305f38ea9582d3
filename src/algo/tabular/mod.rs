pub mod robot;
pub mod value_table;

pub use robot::{ActionCounts, Robot, RobotConfig};
pub use value_table::ValueTable;
