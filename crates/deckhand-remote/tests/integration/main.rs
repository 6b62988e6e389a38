//! Integration tests for deckhand-remote
//!
//! Uses wiremock to simulate the contents API and verifies end-to-end
//! behavior of the client, the `IContentStore` adapter, precondition
//! failures, and rate-limit hard stops.

mod common;

mod test_contents;
mod test_preconditions;
mod test_rate_limit;
