// src/handlers/mod.rs

pub mod article;
pub mod auth;
pub mod report;
pub mod scheme;
pub mod weather;
