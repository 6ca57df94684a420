pub mod aggregate;
pub mod area;
pub mod filter;
pub mod plant;
pub mod record;
pub mod summary;

pub use record::{Dataset, PermitRecord};
