// src/models/mod.rs

pub mod flashcard;
pub mod paper;
pub mod question;
pub mod quiz;
pub mod study;
