pub mod analysis;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod presentation;

pub use model::DisplayFeedback;
pub use normalize::normalize;
pub use presentation::FeedbackView;
