//! videosvc database library
//!
//! Video metadata persistence behind the [`VideoRepository`] trait, plus the
//! [`VideoStore`] and [`EngagementTracker`] services built on top of it.

pub mod db;

pub use db::*;
