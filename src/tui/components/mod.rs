//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Top status bar showing model name and status
//! - `Sidebar`: Model, parameters, theme, templates and key help
//! - `MessageCard`: Individual conversation message rendering
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that manage local state and emit events:
//! - `InputBox`: Prompt field, disabled while a response is pending
//! - `MessageList`: Scrollable conversation view with layout caching
//! - `Picker`: Model / template chooser overlay
//!
//! ## Props-Based Data Flow
//!
//! Components receive external data as props, not by reaching into `App`.
//! `ui::draw_ui` is the only place that reads application state and hands it
//! down.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── sidebar.rs       (Settings panel)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! ├── picker.rs        (Overlay list chooser)
//! └── input_box/       (Prompt field and its character grid)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod picker;
pub use picker::{Picker, PickerEvent, PickerKind, PickerState};
pub mod sidebar;
pub use sidebar::{SIDEBAR_WIDTH, Sidebar};
