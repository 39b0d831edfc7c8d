mod confirm_dialog;
mod error_message;
mod field_error;
mod header;
mod hero;
mod loading_spinner;
mod pagination;
mod require_auth;
mod task_card;

pub use confirm_dialog::ConfirmDialog;
pub use error_message::ErrorMessage;
pub use field_error::{FieldError, GeneralErrors};
pub use header::Header;
pub use hero::Hero;
pub use loading_spinner::LoadingSpinner;
pub use pagination::Pagination;
pub use require_auth::RequireAuth;
pub use task_card::TaskCard;
