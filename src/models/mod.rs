// src/models/mod.rs

pub mod forum;
pub mod page;
pub mod post;
pub mod status;
pub mod thread;
pub mod user;
pub mod vote;
