pub mod calculator;
pub mod events;
pub mod types;

pub use calculator::{aspect_of, peak_time, DEFAULT_ORB};
pub use events::AspectScanner;
pub use types::{Aspect, AstroEvent};
