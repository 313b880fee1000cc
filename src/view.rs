//! Tree-view model for a section: one collapsible node per category, one item
//! per color.

use serde::Serialize;

use crate::color::Hex;
use crate::icon::png_data_uri;
use crate::panel::Section;
use crate::store::CategoryStore;

pub const COPY_COLOR_COMMAND: &str = "copyColorToClipboard";
pub const ADD_COLOR_COMMAND: &str = "addNewColor";
pub const ADD_COLOR_LABEL: &str = "Add New Color";
pub const COLOR_CONTEXT: &str = "color";

/// A command the host runs when an item is activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandBinding {
    pub command: &'static str,
    pub title: &'static str,
    pub arguments: Vec<String>,
}

/// Top-level node of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TreeNode {
    /// Collapsible category holding color items.
    Category { label: String, len: usize },
    /// The trailing "Add New Color" entry.
    Action {
        label: &'static str,
        command: CommandBinding,
    },
}

/// One displayed color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorItem {
    pub label: String,
    /// `data:image/png;base64,...` of the color square.
    pub icon: String,
    pub command: CommandBinding,
    /// `section;category`, read back by [`parse_tooltip`] when deleting.
    pub tooltip: String,
    pub context_value: &'static str,
}

pub fn category_nodes(store: &CategoryStore) -> Vec<TreeNode> {
    store
        .categories()
        .map(|name| TreeNode::Category {
            label: name.to_string(),
            len: store.colors(name).map_or(0, <[Hex]>::len),
        })
        .chain(std::iter::once(TreeNode::Action {
            label: ADD_COLOR_LABEL,
            command: CommandBinding {
                command: ADD_COLOR_COMMAND,
                title: ADD_COLOR_LABEL,
                arguments: Vec::new(),
            },
        }))
        .collect()
}

/// Items for `category`; empty for a category the store does not have.
pub fn color_items(
    section: Section,
    store: &CategoryStore,
    category: &str,
) -> Result<Vec<ColorItem>, image::ImageError> {
    let Some(colors) = store.colors(category) else {
        return Ok(Vec::new());
    };
    colors
        .iter()
        .map(|color| {
            Ok(ColorItem {
                label: color.to_string(),
                icon: png_data_uri(color)?,
                command: CommandBinding {
                    command: COPY_COLOR_COMMAND,
                    title: "Copy Color to Clipboard",
                    arguments: vec![color.to_string()],
                },
                tooltip: tooltip(section, category),
                context_value: COLOR_CONTEXT,
            })
        })
        .collect()
}

pub fn tooltip(section: Section, category: &str) -> String {
    format!("{};{category}", section.name())
}

/// Split a `section;category` tooltip.
pub fn parse_tooltip(tooltip: &str) -> Option<(Section, &str)> {
    let (section, category) = tooltip.split_once(';')?;
    Some((Section::from_name(section)?, category))
}
