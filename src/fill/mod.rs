pub mod applicator;
pub mod autofill;
pub mod control;
pub mod error;
pub mod radio;
pub mod resolver;
pub mod seed;
pub mod session;
