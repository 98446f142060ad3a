#![deny(warnings)]

pub mod config;
pub mod normalize;
pub mod proxy;
pub mod segment;
pub mod translate;
pub mod util;
