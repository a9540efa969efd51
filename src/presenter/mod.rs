pub mod impl_console;
pub mod impl_fake;
#[cfg(feature = "gui")]
pub mod impl_gui;
pub mod interface;
