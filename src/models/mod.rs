// src/models/mod.rs

pub mod article;
pub mod report;
pub mod scheme;
pub mod user;
