//! Test Fixtures Module
//!
//! Programmatically generated audio for the Murf adapter tests:
//! - PCM16 sample generators
//! - Canonical WAV containers wrapping them

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod audio_fixtures;

pub use audio_fixtures::*;
