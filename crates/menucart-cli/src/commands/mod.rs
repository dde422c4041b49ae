//! Subcommands of the `wp-menu-cart` binary

pub mod classes;
pub mod config;
pub mod context;
pub mod fragments;
pub mod hide_notice;
pub mod render;
pub mod status;
