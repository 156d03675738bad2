mod help;
mod page_view;
mod status_bar;

pub use help::HelpWidget;
pub use page_view::PageViewWidget;
pub use status_bar::StatusBarWidget;
