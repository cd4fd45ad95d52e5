#![allow(dead_code)]

pub mod app;
pub mod fixtures;

pub use app::TestApp;
pub use fixtures::*;
