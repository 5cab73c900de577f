//! Shared integration test helpers

pub mod mock_server;
pub mod test_fixtures;
