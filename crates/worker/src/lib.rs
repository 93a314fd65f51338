//! ReelGen worker library.
//!
//! The worker binary claims queued campaigns from the database and
//! drives each one through the generation pipeline. One campaign is
//! in flight per worker process at a time; horizontal scale comes from
//! running more workers, which never collide thanks to the locked
//! claim.

pub mod config;
pub mod queue;
