//! Background Tasks Module
//!
//! Periodic maintenance that runs alongside the pipeline.
//!
//! # Tasks
//! - Expiry sweep: drops cached images that outlived their max age

mod sweep;

pub use sweep::spawn_expiry_task;
