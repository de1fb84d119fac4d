pub mod automation;
pub mod error;
pub mod memory;
pub mod session;
