pub mod cookies;
pub mod error;
pub mod mock;
pub mod scripting;
pub mod tabs;

pub use cookies::{Cookie, CookieStore, CookieTarget, SetCookieParams};
pub use error::BrowserError;
pub use mock::{MockBrowser, MockBrowserConfig};
pub use scripting::{PageScript, ScriptExecutor};
pub use tabs::{Tab, TabId, TabProvider};
