//! Communication Intent & Risk Guard
//!
//! Multi-agent pre-send message analysis: four single-purpose agents
//! (intent, emotion, risk, rewrite) run in a fixed sequence over one
//! hosted completion API, threading earlier results into later
//! prompts, with terminal and browser front ends over the result.

pub mod agent;
pub mod config;
pub mod inference;
pub mod input;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod types;
pub mod web;
