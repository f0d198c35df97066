//! Browser platform layer
//!
//! Handles the browser side of the arcade:
//! - Storage (LocalStorage)
//! - Input listeners and their teardown
//! - The requestAnimationFrame driver exposed to the host page

pub mod driver;
pub mod storage;

pub use driver::GameHandle;
pub use storage::LocalStore;
