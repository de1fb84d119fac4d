use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::browser::error::AutomationError;

/// One `<option>` of a `<select>` control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: &str, text: &str) -> Self {
        Self {
            value: value.to_string(),
            text: text.to_string(),
        }
    }
}

/// The DOM/automation primitives the fill engine is built on.
///
/// Implementations own the elements; the engine only holds handles. Every
/// call may block on a browser round-trip, and any failure is returned as-is.
pub trait Automation {
    /// Handle to a live element.
    type Element: Clone + Debug;

    /// Find all elements in the document matching a CSS selector.
    fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, AutomationError>;

    /// Find descendants of `root` matching a CSS selector, in document order.
    fn find_descendants(
        &mut self,
        root: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, AutomationError>;

    /// Lower-case tag name of the element.
    fn tag_name(&mut self, element: &Self::Element) -> Result<String, AutomationError>;

    /// Attribute value, `None` when absent.
    fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, AutomationError>;

    fn clear(&mut self, element: &Self::Element) -> Result<(), AutomationError>;

    fn send_keys(&mut self, element: &Self::Element, text: &str) -> Result<(), AutomationError>;

    fn click(&mut self, element: &Self::Element) -> Result<(), AutomationError>;

    /// Checked state for checkboxes and radios, selected state for options.
    fn is_selected(&mut self, element: &Self::Element) -> Result<bool, AutomationError>;

    /// Options of a `<select>`, in document order.
    fn options(&mut self, element: &Self::Element) -> Result<Vec<SelectOption>, AutomationError>;

    fn select_by_value(&mut self, element: &Self::Element, value: &str)
    -> Result<(), AutomationError>;

    fn select_by_text(&mut self, element: &Self::Element, text: &str)
    -> Result<(), AutomationError>;

    /// Submit the form the element belongs to.
    fn submit(&mut self, element: &Self::Element) -> Result<(), AutomationError>;
}
