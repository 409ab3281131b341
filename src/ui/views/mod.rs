pub mod quiz;
pub mod ranking;
pub mod result;
pub mod welcome;
