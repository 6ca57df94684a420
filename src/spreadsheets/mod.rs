pub mod import_xlsx;
pub mod plant_xlsx;
pub mod summary_xlsx;

pub use import_xlsx::import_permits;
pub use plant_xlsx::export_plant_xlsx;
pub use summary_xlsx::export_summary_xlsx;
