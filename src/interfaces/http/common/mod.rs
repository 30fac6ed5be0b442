//! Shared HTTP building blocks

mod error;
mod response;
mod validated_json;

pub use error::ApiError;
pub use response::{ApiResponse, EmptyData};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
