mod dashboard;
mod home;
mod legal;
mod login;
mod not_found;
mod register;
mod task_form;
mod tasks;
mod unauthorized;

pub use dashboard::Dashboard;
pub use home::Home;
pub use legal::{Privacy, Terms};
pub use login::Login;
pub use not_found::NotFound;
pub use register::Register;
pub use task_form::{TaskEdit, TaskNew};
pub use tasks::Tasks;
pub use unauthorized::Unauthorized;
