//! The two side panels and the commands that drive them.

use anyhow::Result;
use log::{debug, info, warn};

use crate::color::Hex;
use crate::error::Error;
use crate::pipeline::DEFAULT_VARIATIONS;
use crate::store::{
    CategoryStore, ScanReport, OTHERS, PRIMARY, SHADES, TINTS, USED_PRIMARY_COLORS, USED_SHADES,
    USED_TINTS,
};
use crate::view::parse_tooltip;

pub const INVALID_COLOR_MESSAGE: &str =
    "Invalid hex color. Please enter a valid hex color (e.g., #RRGGBB).";
pub const NO_COLORS_MESSAGE: &str = "No colors found in the current document.";

/// A logical panel, each backed by its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// User-picked colors and the ramp generated from the primary.
    Palette,
    /// Colors found in the scanned document.
    Document,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Palette, Section::Document];

    pub fn name(self) -> &'static str {
        match self {
            Section::Palette => "Palette",
            Section::Document => "Document",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn category_names(self) -> [&'static str; 4] {
        match self {
            Section::Palette => [PRIMARY, TINTS, SHADES, OTHERS],
            Section::Document => [USED_PRIMARY_COLORS, USED_TINTS, USED_SHADES, OTHERS],
        }
    }

    pub fn new_store(self) -> CategoryStore {
        CategoryStore::new(self.category_names())
    }
}

/// Where a newly entered color goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTarget {
    Primary,
    Others,
}

impl AddTarget {
    fn category(self) -> &'static str {
        match self {
            AddTarget::Primary => PRIMARY,
            AddTarget::Others => OTHERS,
        }
    }
}

/// Everything a user can ask the panels to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `input` is raw user text, validated here.
    AddColor {
        input: String,
        target: AddTarget,
        generate: bool,
    },
    /// `tooltip` is the `section;category` of the item being deleted.
    DeleteColor { color: Hex, tooltip: String },
    CopyColor { color: Hex },
    ScanDocument { text: String },
    Reset,
}

/// Side effects the engine needs from its host.
pub trait Host {
    fn write_clipboard(&mut self, text: &str) -> Result<()>;
    fn show_info(&mut self, message: &str);
    fn show_error(&mut self, message: &str);
}

/// Both panels plus the settings that shape generated ramps.
#[derive(Debug)]
pub struct Workspace {
    palette: CategoryStore,
    document: CategoryStore,
    variations: usize,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_VARIATIONS)
    }
}

impl Workspace {
    pub fn new(variations: usize) -> Self {
        Self {
            palette: Section::Palette.new_store(),
            document: Section::Document.new_store(),
            variations,
        }
    }

    pub fn store(&self, section: Section) -> &CategoryStore {
        match section {
            Section::Palette => &self.palette,
            Section::Document => &self.document,
        }
    }

    pub fn store_mut(&mut self, section: Section) -> &mut CategoryStore {
        match section {
            Section::Palette => &mut self.palette,
            Section::Document => &mut self.document,
        }
    }

    /// The color scans are classified against.
    pub fn primary(&self) -> Option<&Hex> {
        self.palette.primary()
    }

    pub fn variations(&self) -> usize {
        self.variations
    }

    /// Run one command. User-facing problems are reported through `host`;
    /// only host failures (such as the clipboard) come back as errors.
    pub fn dispatch(&mut self, command: Command, host: &mut dyn Host) -> Result<()> {
        match command {
            Command::AddColor {
                input,
                target,
                generate,
            } => {
                let color = match Hex::parse(&input) {
                    Ok(color) => color,
                    Err(e) => {
                        warn!("{e}");
                        host.show_error(INVALID_COLOR_MESSAGE);
                        return Ok(());
                    }
                };
                if generate && target == AddTarget::Primary {
                    self.palette
                        .generate_tints_and_shades(&color, self.variations);
                }
                self.palette.add_color(&color, target.category());
            }
            Command::DeleteColor { color, tooltip } => {
                let Some((section, category)) = parse_tooltip(&tooltip) else {
                    warn!("delete {color}: unrecognized item {tooltip:?}");
                    return Ok(());
                };
                if !self.store_mut(section).delete_color(&color, category) {
                    debug!("delete {color}: not in {};{category}", section.name());
                }
                host.show_info(&format!("Deleted {color} from {category}!"));
            }
            Command::CopyColor { color } => {
                host.write_clipboard(color.as_str())?;
                host.show_info(&format!("Copied {color} to clipboard!"));
            }
            Command::ScanDocument { text } => {
                if let Err(Error::EmptyScanResult) = self.scan(&text) {
                    host.show_info(NO_COLORS_MESSAGE);
                }
            }
            Command::Reset => {
                self.palette.reset();
                self.document.reset();
            }
        }
        Ok(())
    }

    /// Scan `text` into the document panel against the palette's primary.
    pub fn scan(&mut self, text: &str) -> Result<ScanReport, Error> {
        let primary = self.palette.primary().cloned();
        let report = self.document.scan(text, primary.as_ref())?;
        info!(
            "scanned {} colors, {} tints, {} shades",
            report.found.len(),
            self.document.colors(USED_TINTS).map_or(0, <[Hex]>::len),
            self.document.colors(USED_SHADES).map_or(0, <[Hex]>::len),
        );
        Ok(report)
    }

    /// Rebuild the palette ramp from the current primary, if there is one.
    pub fn regenerate(&mut self) -> bool {
        let Some(primary) = self.palette.primary().cloned() else {
            return false;
        };
        self.palette
            .generate_tints_and_shades(&primary, self.variations);
        true
    }
}
