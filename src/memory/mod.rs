mod exp;
mod trajectory;

pub use exp::Exp;
pub use trajectory::Trajectory;
