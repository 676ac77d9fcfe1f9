//! Prescription management backend.
//!
//! Analyses uploaded prescriptions, keeps medications and reminders in
//! flat JSON collections, looks up drug alternatives and routes the user
//! to nearby hospitals over a small travel multigraph.

pub mod alternatives;
pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod export;
pub mod facilities;
pub mod graph;
pub mod routing;
pub mod store;
pub mod web;
