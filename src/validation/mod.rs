pub mod baseline;
pub mod diff;
pub mod verdict;
