//! Context menus as plain data.
//!
//! Each item carries a [`MenuCommand`] record naming the action and the
//! polygon it applies to; the controller interprets the record when the
//! item is chosen.

use gpsmanager_core::{Polygon, PolygonId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Open the action menu for one of several overlapping polygons.
    Open,
    Edit,
    Rename,
    Remove,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Open => "Open",
            MenuAction::Edit => "Edit",
            MenuAction::Rename => "Rename",
            MenuAction::Remove => "Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCommand {
    pub action: MenuAction,
    pub target: PolygonId,
}

impl MenuCommand {
    pub fn new(action: MenuAction, target: PolygonId) -> Self {
        Self { action, target }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub command: MenuCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKind {
    /// Edit/rename/remove for a single polygon.
    Actions { target: PolygonId },
    /// One entry per polygon under the cursor; hovering highlights it.
    Disambiguation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub kind: MenuKind,
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Action menu for a stored polygon; `None` if it has no id.
    pub fn actions(polygon: &Polygon) -> Option<Self> {
        let target = polygon.id?;
        let items = [MenuAction::Edit, MenuAction::Rename, MenuAction::Remove]
            .into_iter()
            .map(|action| MenuItem {
                label: action.label().to_string(),
                command: MenuCommand::new(action, target),
            })
            .collect();
        Some(Self {
            kind: MenuKind::Actions { target },
            title: polygon.display_name().to_string(),
            items,
        })
    }

    /// One item per stored polygon, labeled with its display name.
    pub fn disambiguation<'a, I>(polygons: I) -> Self
    where
        I: IntoIterator<Item = &'a Polygon>,
    {
        let items = polygons
            .into_iter()
            .filter_map(|p| {
                p.id.map(|id| MenuItem {
                    label: p.display_name().to_string(),
                    command: MenuCommand::new(MenuAction::Open, id),
                })
            })
            .collect();
        Self {
            kind: MenuKind::Disambiguation,
            title: "Select polygon".to_string(),
            items,
        }
    }

    pub fn item(&self, index: usize) -> Option<&MenuItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
