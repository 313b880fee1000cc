//! Named color buckets with change notification.
//!
//! A [`CategoryStore`] is built with a fixed, ordered list of category names.
//! Every mutating operation that names a category the store does not have is
//! silently ignored (logged at debug level), so one command set can drive
//! stores with different layouts.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use crate::color::Hex;
use crate::error::{Error, Result};
use crate::pipeline::{classify, extract_colors, generate_ramp, unique, Ramp};

pub const PRIMARY: &str = "Primary";
pub const TINTS: &str = "Tints";
pub const SHADES: &str = "Shades";
pub const OTHERS: &str = "Others";
pub const USED_PRIMARY_COLORS: &str = "UsedPrimaryColors";
pub const USED_TINTS: &str = "UsedTints";
pub const USED_SHADES: &str = "UsedShades";

/// What changed in a store. Delivered to subscribers synchronously, from
/// inside the mutating call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Added { category: String, color: Hex },
    Deleted { category: String, color: Hex },
    Reset,
    Generated { base: Hex },
    Scanned { found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Change)>;

/// Result of [`CategoryStore::scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Distinct colors found in the text, in extraction order.
    pub found: Vec<Hex>,
    /// Whether the primary was among the colors scanned so far.
    pub primary_found: bool,
    /// Every category after the scan.
    pub categories: IndexMap<String, Vec<Hex>>,
}

pub struct CategoryStore {
    categories: IndexMap<String, Vec<Hex>>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl CategoryStore {
    /// Create a store with the given categories, all empty. Repeated names
    /// collapse into one category.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Colors in `category`, or `None` if the store has no such category.
    pub fn colors(&self, category: &str) -> Option<&[Hex]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// The reference color: first entry of `Primary`, or of
    /// `UsedPrimaryColors` when the store has no `Primary` category.
    pub fn primary(&self) -> Option<&Hex> {
        let list = self
            .categories
            .get(PRIMARY)
            .or_else(|| self.categories.get(USED_PRIMARY_COLORS))?;
        list.first()
    }

    /// Ordered copy of every category.
    pub fn snapshot(&self) -> IndexMap<String, Vec<Hex>> {
        self.categories.clone()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Append `color` to `category` unless it is already there.
    ///
    /// Subscribers are notified even when the color was a duplicate.
    pub fn add_color(&mut self, color: &Hex, category: &str) {
        let Some(list) = self.categories.get_mut(category) else {
            debug!("add {color}: no category {category:?}, ignored");
            return;
        };
        if list.contains(color) {
            trace!("add {color}: already in {category}");
        } else {
            trace!("add {color} to {category}");
            list.push(color.clone());
        }
        self.notify(Change::Added {
            category: category.to_string(),
            color: color.clone(),
        });
    }

    /// Remove the first occurrence of `color` from `category`. Returns whether
    /// anything was removed; subscribers only hear about actual removals.
    pub fn delete_color(&mut self, color: &Hex, category: &str) -> bool {
        let Some(list) = self.categories.get_mut(category) else {
            debug!("delete {color}: no category {category:?}, ignored");
            return false;
        };
        let Some(index) = list.iter().position(|c| c == color) else {
            return false;
        };
        list.remove(index);
        trace!("deleted {color} from {category}");
        self.notify(Change::Deleted {
            category: category.to_string(),
            color: color.clone(),
        });
        true
    }

    /// Empty every category.
    pub fn reset(&mut self) {
        for list in self.categories.values_mut() {
            list.clear();
        }
        trace!("reset {} categories", self.categories.len());
        self.notify(Change::Reset);
    }

    /// Replace `Tints` and `Shades` with the ramp derived from `base`.
    ///
    /// Does nothing when the store has neither category.
    pub fn generate_tints_and_shades(&mut self, base: &Hex, variations: usize) -> Ramp {
        let ramp = generate_ramp(base, variations);
        if !self.has_category(TINTS) && !self.has_category(SHADES) {
            debug!("generate from {base}: no {TINTS}/{SHADES} categories, ignored");
            return ramp;
        }
        self.replace(TINTS, ramp.tints.clone());
        self.replace(SHADES, ramp.shades.clone());
        trace!("generated {} tints and shades from {base}", variations);
        self.notify(Change::Generated { base: base.clone() });
        ramp
    }

    /// Extract the colors in `text` and file them.
    ///
    /// New colors land in `Others`. With a primary, every filed color is
    /// re-classified against it: `UsedPrimaryColors` holds just the primary
    /// (or nothing when the text never used it), darker colors go to
    /// `UsedShades` and brighter ones to `UsedTints`. `Others` never keeps the
    /// primary or anything placed in those buckets.
    ///
    /// Text without any color literal is [`Error::EmptyScanResult`] and leaves
    /// the store untouched.
    pub fn scan(&mut self, text: &str, primary: Option<&Hex>) -> Result<ScanReport> {
        let found = unique(extract_colors(text));
        if found.is_empty() {
            return Err(Error::EmptyScanResult);
        }
        debug!("scan found {} distinct colors", found.len());

        for color in &found {
            self.push_unique(OTHERS, color);
        }

        let mut primary_found = false;
        if let Some(primary) = primary {
            let pool = unique(
                [USED_PRIMARY_COLORS, USED_SHADES, USED_TINTS, OTHERS]
                    .iter()
                    .filter_map(|name| self.categories.get(*name))
                    .flatten()
                    .cloned()
                    .chain(found.iter().cloned()),
            );
            let classification = classify(primary, &pool);
            primary_found = classification.primary_found;
            let used_primary = if primary_found {
                vec![primary.clone()]
            } else {
                Vec::new()
            };
            self.replace(USED_PRIMARY_COLORS, used_primary);
            self.replace(USED_SHADES, classification.shades);
            self.replace(USED_TINTS, classification.tints);

            let placed: Vec<Hex> = [USED_SHADES, USED_TINTS]
                .iter()
                .filter_map(|name| self.categories.get(*name))
                .flatten()
                .cloned()
                .collect();
            if let Some(others) = self.categories.get_mut(OTHERS) {
                others.retain(|c| c != primary && !placed.contains(c));
            }
        }

        self.notify(Change::Scanned { found: found.len() });
        Ok(ScanReport {
            found,
            primary_found,
            categories: self.snapshot(),
        })
    }

    fn push_unique(&mut self, category: &str, color: &Hex) {
        if let Some(list) = self.categories.get_mut(category) {
            if !list.contains(color) {
                list.push(color.clone());
            }
        }
    }

    fn replace(&mut self, category: &str, colors: Vec<Hex>) {
        if let Some(list) = self.categories.get_mut(category) {
            *list = colors;
        }
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(&change);
        }
    }
}

impl fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryStore")
            .field("categories", &self.categories)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn hex(s: &str) -> Hex {
        Hex::parse(s).unwrap()
    }

    fn palette_store() -> CategoryStore {
        CategoryStore::new([PRIMARY, TINTS, SHADES, OTHERS])
    }

    fn document_store() -> CategoryStore {
        CategoryStore::new([USED_PRIMARY_COLORS, USED_TINTS, USED_SHADES, OTHERS])
    }

    fn record(store: &mut CategoryStore) -> Rc<RefCell<Vec<Change>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |change| sink.borrow_mut().push(change.clone()));
        events
    }

    #[test]
    fn new_store_has_empty_categories_in_order() {
        let store = palette_store();
        assert_eq!(
            store.categories().collect::<Vec<_>>(),
            [PRIMARY, TINTS, SHADES, OTHERS]
        );
        assert!(store.categories().all(|c| store.colors(c).unwrap().is_empty()));
        assert_eq!(store.colors(USED_TINTS), None);
    }

    #[test]
    fn add_twice_keeps_one_entry_and_notifies_both_times() {
        let mut store = palette_store();
        let events = record(&mut store);
        store.add_color(&hex("#123456"), OTHERS);
        store.add_color(&hex("#123456"), OTHERS);
        assert_eq!(store.colors(OTHERS).unwrap().len(), 1);
        assert_eq!(events.borrow().len(), 2);
    }

    #[test]
    fn add_to_unknown_category_is_ignored() {
        let mut store = palette_store();
        let events = record(&mut store);
        store.add_color(&hex("#123456"), "Favorites");
        assert!(events.borrow().is_empty());
        assert!(store.categories().all(|c| store.colors(c).unwrap().is_empty()));
    }

    #[test]
    fn delete_removes_first_match_only_when_present() {
        let mut store = palette_store();
        store.add_color(&hex("#111111"), OTHERS);
        store.add_color(&hex("#222222"), OTHERS);
        let events = record(&mut store);

        assert!(store.delete_color(&hex("#111111"), OTHERS));
        assert_eq!(store.colors(OTHERS).unwrap(), [hex("#222222")]);
        assert!(!store.delete_color(&hex("#111111"), OTHERS));
        assert!(!store.delete_color(&hex("#222222"), TINTS));
        assert!(!store.delete_color(&hex("#222222"), "Nope"));
        assert_eq!(
            *events.borrow(),
            [Change::Deleted {
                category: OTHERS.to_string(),
                color: hex("#111111"),
            }]
        );
    }

    #[test]
    fn reset_clears_everything_with_one_notification() {
        let mut store = palette_store();
        store.add_color(&hex("#808080"), PRIMARY);
        store.generate_tints_and_shades(&hex("#808080"), 15);
        store.add_color(&hex("#00ff00"), OTHERS);
        let events = record(&mut store);

        store.reset();
        assert!(store.categories().all(|c| store.colors(c).unwrap().is_empty()));
        assert_eq!(*events.borrow(), [Change::Reset]);
        assert_eq!(store.primary(), None);
    }

    #[test]
    fn generate_overwrites_tints_and_shades() {
        let mut store = palette_store();
        store.generate_tints_and_shades(&hex("#ff0000"), 15);
        store.generate_tints_and_shades(&hex("#808080"), 15);
        let tints = store.colors(TINTS).unwrap();
        let shades = store.colors(SHADES).unwrap();
        assert_eq!(tints.len(), 15);
        assert_eq!(shades.len(), 15);
        assert_eq!(tints[0], "#888888");
        assert_eq!(shades[0], "#787878");
    }

    #[test]
    fn generate_without_ramp_categories_is_ignored() {
        let mut store = document_store();
        let events = record(&mut store);
        let ramp = store.generate_tints_and_shades(&hex("#808080"), 15);
        assert_eq!(ramp.tints.len(), 15);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn primary_is_first_entry() {
        let mut store = palette_store();
        store.add_color(&hex("#aa0000"), PRIMARY);
        store.add_color(&hex("#00aa00"), PRIMARY);
        assert_eq!(store.primary(), Some(&hex("#aa0000")));

        let mut doc = document_store();
        assert_eq!(doc.primary(), None);
        doc.add_color(&hex("#0000aa"), USED_PRIMARY_COLORS);
        assert_eq!(doc.primary(), Some(&hex("#0000aa")));
    }

    #[test]
    fn scan_without_primary_fills_others() {
        let mut store = document_store();
        let report = store.scan("#FF0000 rgb(0,255,0) #0f0", None).unwrap();
        assert_eq!(report.found, [hex("#FF0000"), hex("#00ff00")]);
        assert!(!report.primary_found);
        assert_eq!(store.colors(OTHERS).unwrap(), report.found.as_slice());
        assert!(store.colors(USED_TINTS).unwrap().is_empty());
    }

    #[test]
    fn scan_with_primary_classifies_and_drains_others() {
        let mut store = document_store();
        let events = record(&mut store);
        let primary = hex("#808080");
        let report = store
            .scan("#FFFFFF #000000 #808080 #404040 #c0c0c0", Some(&primary))
            .unwrap();

        assert!(report.primary_found);
        assert_eq!(store.colors(USED_PRIMARY_COLORS).unwrap(), [primary.clone()]);
        assert_eq!(store.colors(USED_TINTS).unwrap(), [hex("#c0c0c0"), hex("#FFFFFF")]);
        assert_eq!(store.colors(USED_SHADES).unwrap(), [hex("#404040"), hex("#000000")]);
        assert!(store.colors(OTHERS).unwrap().is_empty());
        assert_eq!(report.categories, store.snapshot());
        assert_eq!(*events.borrow(), [Change::Scanned { found: 5 }]);
    }

    #[test]
    fn later_scan_with_primary_reclassifies_earlier_others() {
        let mut store = document_store();
        store.scan("#111111 #eeeeee", None).unwrap();
        store.scan("#808080 #999999", Some(&hex("#808080"))).unwrap();
        assert_eq!(store.colors(USED_TINTS).unwrap(), [hex("#999999"), hex("#eeeeee")]);
        assert_eq!(store.colors(USED_SHADES).unwrap(), [hex("#111111")]);
        assert!(store.colors(OTHERS).unwrap().is_empty());
    }

    #[test]
    fn repeated_scans_merge_buckets() {
        let mut store = document_store();
        let primary = hex("#808080");
        store.scan("#ffffff", Some(&primary)).unwrap();
        store.scan("#cccccc #ffffff", Some(&primary)).unwrap();
        assert_eq!(store.colors(USED_TINTS).unwrap(), [hex("#cccccc"), hex("#ffffff")]);
    }

    #[test]
    fn scan_drops_primary_from_others_without_primary_bucket() {
        let mut store = CategoryStore::new([USED_TINTS, USED_SHADES, OTHERS]);
        let primary = hex("#808080");
        let report = store.scan("#808080 #ffffff", Some(&primary)).unwrap();
        assert!(report.primary_found);
        assert_eq!(store.colors(USED_TINTS).unwrap(), [hex("#ffffff")]);
        assert!(
            store.colors(OTHERS).unwrap().is_empty(),
            "primary left in Others: {:?}",
            store.colors(OTHERS)
        );
    }

    #[test]
    fn changed_primary_replaces_the_old_one() {
        let mut store = document_store();
        store.scan("#808080 #ffffff", Some(&hex("#808080"))).unwrap();
        store.scan("#ffffff", Some(&hex("#ffffff"))).unwrap();

        assert_eq!(store.colors(USED_PRIMARY_COLORS).unwrap(), [hex("#ffffff")]);
        assert_eq!(store.primary(), Some(&hex("#ffffff")));
        assert_eq!(store.colors(USED_SHADES).unwrap(), [hex("#808080")]);
        assert!(store.colors(USED_TINTS).unwrap().is_empty());
        assert!(store.colors(OTHERS).unwrap().is_empty());
    }

    #[test]
    fn primary_absent_from_document_empties_primary_bucket() {
        let mut store = document_store();
        store.scan("#808080 #ffffff", Some(&hex("#808080"))).unwrap();
        let report = store.scan("#000000", Some(&hex("#123456"))).unwrap();

        assert!(!report.primary_found);
        assert!(store.colors(USED_PRIMARY_COLORS).unwrap().is_empty());
        assert_eq!(store.colors(USED_TINTS).unwrap(), [hex("#808080"), hex("#ffffff")]);
        assert_eq!(store.colors(USED_SHADES).unwrap(), [hex("#000000")]);
    }

    #[test]
    fn empty_scan_is_reported_and_changes_nothing() {
        let mut store = document_store();
        store.add_color(&hex("#123123"), OTHERS);
        let events = record(&mut store);
        let before = store.snapshot();

        assert_eq!(store.scan("no colors here", None), Err(Error::EmptyScanResult));
        assert_eq!(store.snapshot(), before);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = palette_store();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(move |_| *sink.borrow_mut() += 1);
        store.reset();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.reset();
        assert_eq!(*count.borrow(), 1);
    }
}
