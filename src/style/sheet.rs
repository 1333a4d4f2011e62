//! Stylesheet - CSS blocks currently applied to the document.
//!
//! One block per [`StyleId`], kept in allocation order so the combined
//! stylesheet is deterministic.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::StyleId;

thread_local! {
    static SHEET: RefCell<BTreeMap<StyleId, String>> = const { RefCell::new(BTreeMap::new()) };
}

/// Replace the block for `id` as a whole.
pub(crate) fn apply(id: &StyleId, css: String) {
    SHEET.with(|sheet| {
        sheet.borrow_mut().insert(id.clone(), css);
    });
}

/// Whether a block is applied for `id`.
pub(crate) fn contains(id: &StyleId) -> bool {
    SHEET.with(|sheet| sheet.borrow().contains_key(id))
}

/// Remove the block for `id`. Returns whether it was present.
pub(crate) fn remove(id: &StyleId) -> bool {
    SHEET.with(|sheet| sheet.borrow_mut().remove(id).is_some())
}

/// CSS text currently applied for `id`.
pub fn css_for(id: &StyleId) -> Option<String> {
    SHEET.with(|sheet| sheet.borrow().get(id).cloned())
}

/// The whole stylesheet, blocks joined in allocation order.
pub fn stylesheet() -> String {
    SHEET.with(|sheet| {
        sheet
            .borrow()
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Number of applied blocks.
pub fn style_count() -> usize {
    SHEET.with(|sheet| sheet.borrow().len())
}

/// Remove every block (for testing).
pub fn reset_stylesheet() {
    SHEET.with(|sheet| sheet.borrow_mut().clear());
}
