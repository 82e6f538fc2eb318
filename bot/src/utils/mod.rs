pub mod url_validation;
pub use url_validation::{AudioUrlPolicy, UrlValidationError, validate_audio_url};
