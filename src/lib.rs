#[macro_use]
extern crate log;
#[macro_use]
extern crate derive_builder;
#[macro_use]
extern crate lazy_static;

pub mod browser_controller;
pub mod crawler;
pub mod dom;
pub mod extract;
pub mod number;
pub mod options;
pub mod output;
pub mod processing;
pub mod runner;
pub mod selectors;
pub mod types;
pub mod utils;
