pub mod catalog;
pub mod injector;
pub mod tag;
