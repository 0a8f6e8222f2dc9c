pub mod contact;
pub mod feedback;
