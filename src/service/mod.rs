pub mod automation;
pub mod command;
pub mod news;
