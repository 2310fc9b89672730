mod check;
mod init;
mod migrate;
mod stats;
mod status;
mod users;

pub use check::cmd_check;
pub use init::cmd_init;
pub use migrate::cmd_migrate;
pub use stats::cmd_stats;
pub use status::cmd_status;
pub use users::{cmd_users_list, cmd_users_preview};
