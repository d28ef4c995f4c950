pub mod config;
pub mod counter;
pub mod feed;
pub mod pose;
pub mod sim;
