//! Terminal frontend: a setup screen for the roster and a table screen for play.

pub mod app;
pub mod controller;
pub mod ui;
