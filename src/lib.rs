/// Still Control Library
/// 
/// Range slider core, serial link and controller shared by the GUI and
/// the probe tool

pub mod config_loader;
pub mod slider_style;
pub mod range_slider;
pub mod still_protocol;
pub mod still_link;
pub mod controller;
pub mod slider_widget;
