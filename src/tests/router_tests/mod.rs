mod auth_tests;
mod dashboard_tests;
mod export_tests;

pub use admin_tests::*;
pub use auth_flow_tests::*;
pub use auth_tests::*;
pub use dashboard_tests::*;
pub use export_tests::*;
