// Components module - reusable UI building blocks
//
// Shell components are rendered on every page:
// - Title bar: app name, current page, API base
// - Status bar: key hints for the focused area
// - Logs panel: system log entries
//
// Page components (board panel, tag chips) are shared by the actor and
// movie views.

pub mod board_panel;
pub mod formatters;
pub mod logs_panel;
pub mod status_bar;
pub mod tags;
pub mod title_bar;
