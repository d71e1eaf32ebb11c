//! Core library modules for index-crawler
//!
//! This module contains the internal implementation details of the index-crawler library.

pub mod error;
pub mod target;
pub mod transport;
pub mod listing;
pub mod classify;
pub mod crawler;

#[cfg(test)]
pub(crate) mod testing;
