pub mod card_grid_ui;
pub mod game_info_ui;
pub mod glib_scheduler;
pub mod window;

pub use glib_scheduler::GlibScheduler;
