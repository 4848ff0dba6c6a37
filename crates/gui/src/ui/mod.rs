pub mod lines_panel;
pub mod status_bar;
