//! Command implementations.

pub mod categorize;
pub mod check;
pub mod chunk;
pub mod classify;
pub mod init;

pub use self::categorize::execute_categorize;
pub use self::check::execute_check;
pub use self::chunk::execute_chunk;
pub use self::classify::{execute_classify, execute_extract};
pub use self::init::execute_init;
