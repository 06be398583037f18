#![cfg_attr(not(test), no_std)]

//! stm_mill - G-code parameter engine for an STM32-based CNC controller
//!
//! This library provides the RS274/NGC numeric expression evaluator, the
//! numbered parameter table with PLC I/O dispatch, the `$` settings registry
//! and the checksummed EEPROM persistence layer.

// Platform abstraction layer (EEPROM, PLC I/O, machine position, reporting)
pub mod platform;

// Unified logging macros (defmt on hardware, println in host tests)
pub mod logging;

// RS274/NGC expression evaluation and parameter-setting items
pub mod gcode;

// Numbered parameter table and live-value dispatch
pub mod params;

// Settings registry and EEPROM persistence
pub mod settings;
