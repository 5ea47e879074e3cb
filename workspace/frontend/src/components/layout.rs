mod sidebar;
mod view;

pub use sidebar::Sidebar;
pub use view::Layout;
