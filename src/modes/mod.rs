pub mod headless;
pub mod play;
pub mod ticker;

pub use headless::{HeadlessMode, HeadlessReport};
pub use play::PlayMode;
pub use ticker::IntervalScheduler;
