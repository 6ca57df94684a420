pub mod errors;
pub mod html;
pub mod redirect;
pub mod xlsx;

pub use errors::error_to_response;
pub use html::{html_response, html_response_with_status};
pub use redirect::{redirect, redirect_with_notice};
pub use xlsx::xlsx_response;

// The handler result alias lives next to ServerError.
pub use crate::errors::ResultResp;
