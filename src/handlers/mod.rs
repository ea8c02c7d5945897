// src/handlers/mod.rs

pub mod papers;
pub mod quiz;
pub mod study;
pub mod upload;
