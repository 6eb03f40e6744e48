extern crate approx;

pub mod app;
pub mod common;
pub mod control;
pub mod data;
pub mod render;
pub mod settings;
