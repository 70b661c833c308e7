pub mod app;
pub mod camera_controls;
pub mod controls_panel;
pub mod grid_view;
pub mod status_panel;
