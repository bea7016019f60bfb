pub mod experiment;
pub mod generate;
pub mod mec;
pub mod select;
pub mod suite;
