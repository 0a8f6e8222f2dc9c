//! Domain layer for the Asmakam feedback service.
//!
//! Holds everything that does not touch the network or the filesystem:
//! the feedback record model and its shared validation ruleset, the
//! feedback wizard state machine, the admin dashboard transforms (filter,
//! search, sort, stats, CSV export) and the order contact details.

pub mod contact;
pub mod dashboard;
pub mod error;
pub mod feedback;
pub mod types;
pub mod wizard;
