// REST mirror of the read-only GraphQL operations
pub mod routes;

pub use routes::get_leaderboard;
