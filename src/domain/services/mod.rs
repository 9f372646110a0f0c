pub mod artifact;
pub mod regression;
pub mod training;
