//! Domain entities - the core business objects.

mod post;
mod principal;
mod upload;
mod user;

pub use post::{Post, PostChanges};
pub use principal::Principal;
pub use upload::UploadedFile;
pub use user::User;
