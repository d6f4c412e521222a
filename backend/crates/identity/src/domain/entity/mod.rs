//! Entity Module

pub mod credential;
