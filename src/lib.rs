// ABOUTME: Library crate for gigboard exposing the API client, session store, TUI state and CLI for testing

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod credentials;
pub mod models;
pub mod session;
