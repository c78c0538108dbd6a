pub mod item;
pub mod notion;

pub use item::*;
pub use notion::*;
