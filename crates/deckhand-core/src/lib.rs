//! Deckhand Core - Domain logic for the hot/cold deploy engine
//!
//! Contains the domain entities, validated newtypes, canonical hashing,
//! configuration, and the port traits that adapters implement. No I/O
//! happens in this crate.

pub mod config;
pub mod domain;
pub mod ports;
