// src/lib.rs
//! Interactive point-cloud globe viewer.
//!
//! Renders the earth as a textured point cloud with a starfield backdrop,
//! lifts and recolors the points under the pointer, and shows the country,
//! time zone and local time of the hovered spot in a popup.

pub mod app;
pub mod assets;
pub mod camera;
pub mod config;
pub mod data;
pub mod net;
pub mod renderer;
pub mod ui;
