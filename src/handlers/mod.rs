// src/handlers/mod.rs

pub mod forum;
pub mod post;
pub mod service;
pub mod thread;
pub mod user;
