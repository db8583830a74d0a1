pub mod controller;
pub mod message;
pub mod state;

pub use controller::FeedController;
pub use message::{FeedAction, FeedMessage};
pub use state::{FeedState, FeedStatus};
