//! Triage daemon: loads chat, agent and knowledge-base snapshots, creates
//! tickets and keeps escalating them on a timer.

#![allow(clippy::uninlined_format_args)]

pub mod config;
pub mod fixtures;
pub mod runner;
