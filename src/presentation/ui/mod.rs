//! UI screens.

mod app;
mod forms;
mod login_screen;
mod main_screen;
mod requests;
mod tabs;
pub mod utils;

pub use app::App;
pub use login_screen::LoginScreen;
pub use main_screen::{MainAction, MainScreen, MainSettings};
pub use requests::{AppEvent, Dispatcher, Request};
pub use tabs::Tab;
