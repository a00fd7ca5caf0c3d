//! Interactive goal browser
//!
//! The session is split into a pure core and a thin host:
//! - `model` / `reducer` - session state and the event → (state, effects) step
//! - `layout` / `filter` / `form` / `validation` - the pieces the reducer uses
//! - `render` - draws a session into a character [`Frame`]
//! - `runner` - performs effects and reports back as events
//! - `app` - the iocraft component wiring terminal input to the reducer

pub mod app;
pub mod filter;
pub mod form;
pub mod keymap;
pub mod layout;
pub mod model;
pub mod reducer;
pub mod render;
pub mod runner;
pub mod theme;
pub mod validation;

pub use app::{GoalBrowser, GoalBrowserProps};
pub use model::{Effect, Event, Key, SessionSettings, SessionState, Viewport};
pub use reducer::{handle, initial};
pub use render::{Frame, render};
pub use runner::EffectRunner;
pub use theme::Theme;
