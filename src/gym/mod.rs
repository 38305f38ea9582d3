pub mod recycling_robot;

pub use recycling_robot::{RecyclingRobot, RecyclingRobotConfig};
