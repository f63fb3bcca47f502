// src/utils/mod.rs

pub mod hash;
pub mod text;
pub mod token;
pub mod upload;
