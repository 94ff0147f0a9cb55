pub mod errors;
pub mod html;
pub mod json;

use crate::errors::ServerError;
use astra::Response;

pub type ResultResp = Result<Response, ServerError>;

pub use errors::html_error_response;
pub use html::{html_response, redirect_response, text_response};
pub use json::json_response;
