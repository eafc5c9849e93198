// include-fixer/src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod inventory;
pub mod rewrite;

pub mod fix;
pub mod summary;

pub mod commands;
