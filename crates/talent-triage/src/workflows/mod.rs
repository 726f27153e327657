pub mod applications;
pub mod matching;
