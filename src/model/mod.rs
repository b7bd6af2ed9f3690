pub mod platform;
pub mod profile;
pub mod reel;
pub mod scored;
pub mod video;

pub use platform::Platform;
pub use profile::{DateRange, ScoringProfile};
pub use scored::ScoredVideoRecord;
pub use video::{TrendDirection, VideoRecord};
