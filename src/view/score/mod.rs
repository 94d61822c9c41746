pub mod scoreboard;
pub mod template;
pub mod weekly;

pub use scoreboard::*;
pub use template::*;
pub use weekly::*;
