//! Spindle Core - Playlist engine
//!
//! This crate provides the in-memory playlist with its current-track
//! cursor, and the command set used to drive it. It performs no I/O.

pub mod command;
pub mod playlist;

pub use command::{ Command, CommandError };
pub use playlist::{ EntryId, Playlist, PlaylistError, PlaylistRow, Track };
