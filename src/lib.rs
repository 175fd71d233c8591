//! Wayfarer - Experience & Experience Card engine.
//!
//! The trip-builder core of the Wayfarer travel platform: the mutable
//! Experience aggregate with derived pricing and itinerary, the
//! payment-gated shareable Experience Card, and the orchestration
//! services the surrounding API layer drives.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
