pub mod generator;
pub mod lookup;
