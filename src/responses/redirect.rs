// responses/redirect.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};

/// Plain 302 redirect.
pub fn redirect(location: &str) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(302)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}

/// 302 redirect carrying a one-shot notice in the query string. The target
/// page picks it up and renders the banner; nothing is stored server-side.
pub fn redirect_with_notice(location: &str, kind: &str, message: &str) -> ResultResp {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("notice", kind)
        .append_pair("message", message)
        .finish();
    let sep = if location.contains('?') { '&' } else { '?' };
    redirect(&format!("{location}{sep}{query}"))
}
