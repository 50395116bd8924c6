pub mod energy;
pub mod options;
