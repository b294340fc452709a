pub mod headless;
pub mod play;

pub use headless::{HeadlessConfig, HeadlessMode, HeadlessSummary};
pub use play::PlayMode;
