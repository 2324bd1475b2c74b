#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod payload;
pub mod sampling;
pub mod thermistor;
