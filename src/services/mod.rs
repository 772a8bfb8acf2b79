pub mod errors;
pub mod image_host;
pub mod mailer;

#[cfg(test)]
pub mod test_server;

pub use errors::{MailError, UploadError};
pub use image_host::{CloudinaryHost, ImageHost};
pub use mailer::{EmailJsMailer, Mailer};
