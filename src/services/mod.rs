//! Operation services.
//!
//! - Objects: delete, get and put
//! - Buckets: listing

mod buckets;
mod objects;

pub use buckets::BucketsService;
pub use objects::ObjectsService;
