pub mod command_line;
pub mod grid_view;
pub mod status_bar;
pub mod summary;
pub mod viewport;

pub use command_line::{CommandLine, CommandView};
pub use grid_view::GridView;
pub use status_bar::StatusBar;
pub use summary::{Summary, SummaryView};
