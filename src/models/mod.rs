pub mod entry;
pub mod movie;

pub use entry::{LedgerEntry, TIMESTAMP_FORMAT};
pub use movie::{Country, Genre, MovieDetails, MovieId, MovieSummary};
