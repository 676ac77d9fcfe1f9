//! Drug alternatives from the RxNorm terminology service.

mod cache;
mod client;
mod error;

pub use cache::{AlternativesCacheConfig, CachedAlternatives};
pub use client::{RxNavClient, RxNavConfig};
pub use error::AlternativesError;
