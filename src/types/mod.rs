//! Types for the S3 object adapter.

mod common;
mod requests;
mod responses;

pub use common::*;
pub use requests::*;
pub use responses::*;
