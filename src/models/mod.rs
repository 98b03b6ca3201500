pub mod gacha;
pub mod prize;
pub mod settings;
pub mod spin;

pub use gacha::*;
pub use prize::*;
pub use settings::*;
pub use spin::*;
