pub mod feedback_repo;

pub use feedback_repo::FeedbackRepo;
