mod create;
mod eval;
mod info;
mod inspect;
mod requirements;
mod toolchain;

pub use create::{CreateArgs, cmd_create};
pub use eval::EvalArgs;
pub use info::cmd_info;
pub use inspect::cmd_inspect;
pub use requirements::cmd_requirements;
pub use toolchain::cmd_toolchain;
