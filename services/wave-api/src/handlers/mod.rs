//! HTTP request handlers for the wave API.

pub mod health;
pub mod wave_data;
