pub mod scenarios;
pub mod generator;
pub mod emit;
