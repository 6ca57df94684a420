pub mod dashboard;
pub mod login;
pub mod register;

pub use dashboard::{dashboard_page, AdminVm, DashboardVm, UploadVm, UserRowVm};
pub use login::{login_page, LoginVm};
pub use register::{register_page, RegisterVm};
