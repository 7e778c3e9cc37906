//! Asset Module
//!
//! Cache key policy and the lookup-or-fetch resolver for record images.

pub mod keys;
pub mod resolver;

pub use keys::{key_for, Variant};
pub use resolver::AssetResolver;
