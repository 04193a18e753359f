//! Operator interaction contract: prompts, error dialogs and menus.

use gpsmanager_core::Polygon;

use crate::menu::Menu;

pub trait Operator {
    /// Ask for a name for `polygon`. `None` means the prompt was cancelled
    /// and the current name is kept.
    fn prompt_polygon_name(&mut self, polygon: &Polygon) -> Option<String>;

    fn report_error(&mut self, title: &str, message: &str);

    fn show_menu(&mut self, menu: &Menu);

    fn close_menu(&mut self);
}
