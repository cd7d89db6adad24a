//! This module defines and re-exports the interfaces for the repository.
//! It serves as a central point for accessing traits related to data interaction.
mod reviews;
mod votes;

pub use reviews::ReviewsRepository;
pub use votes::VotesRepository;
