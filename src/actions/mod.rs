//! Use-case actions. Each is built per request from cloned repositories.

mod change_password;
mod forgot_password;
mod login;
mod register;
mod reset_password;
mod timeline;
mod update_profile;
mod users;

pub use change_password::ChangePasswordAction;
pub use forgot_password::{ForgotPasswordAction, ForgotPasswordConfig, ResetRequested};
pub use login::LoginAction;
pub use register::{RegisterAction, Registration};
pub use reset_password::ResetPasswordAction;
pub use timeline::{AddTimelineEntryAction, DeleteTimelineEntryAction};
pub use update_profile::{ProfileChanges, UpdateProfileAction};
pub use users::{GetPortfolioOwnerAction, ListUsersAction};
