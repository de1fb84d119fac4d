use crate::browser::automation::Automation;
use crate::browser::error::AutomationError;

/// Descendant query used to expand containers into fillable controls.
pub const FILLABLE_SELECTOR: &str = "input, select, textarea, datalist";

/// What to do with an element found in the caller's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Select,
    /// `input`, `textarea` or `datalist`, refined by the `type` attribute.
    TextLike,
    /// Not a control: search its descendants instead.
    Expand,
}

pub fn route(tag: &str) -> Route {
    match tag {
        "select" => Route::Select,
        "input" | "textarea" | "datalist" => Route::TextLike,
        _ => Route::Expand,
    }
}

/// Closed set of control types, decided once at discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Select,
    TextLike,
    Checkbox,
    Radio,
    Hidden,
    Submit,
}

impl ControlKind {
    /// Refine a text-like route by the element's `type` attribute.
    pub fn from_input_type(input_type: Option<&str>) -> Self {
        match input_type.map(str::to_ascii_lowercase).as_deref() {
            Some("radio") => ControlKind::Radio,
            Some("checkbox") => ControlKind::Checkbox,
            Some("hidden") => ControlKind::Hidden,
            Some("submit") => ControlKind::Submit,
            _ => ControlKind::TextLike,
        }
    }

    /// Hidden and submit inputs are never touched.
    pub fn is_fillable(self) -> bool {
        !matches!(self, ControlKind::Hidden | ControlKind::Submit)
    }
}

/// A discovered leaf control.
#[derive(Debug, Clone)]
pub struct Control<E> {
    pub element: E,
    pub kind: ControlKind,
    /// `id` if non-empty, else `name`; `None` when both are empty.
    pub key: Option<String>,
    pub name: Option<String>,
}

impl<E> Control<E> {
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}

/// Pick the identifying key of a control.
pub fn control_key(id: Option<String>, name: Option<String>) -> Option<String> {
    non_empty(id).or_else(|| non_empty(name))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Read the attributes of a leaf and classify it. Returns `None` when the
/// element is not a form control at all.
pub fn classify_control<A: Automation>(
    automation: &mut A,
    element: &A::Element,
) -> Result<Option<Control<A::Element>>, AutomationError> {
    let tag = automation.tag_name(element)?;

    let kind = match route(&tag) {
        Route::Select => ControlKind::Select,
        Route::TextLike => {
            let input_type = automation.attribute(element, "type")?;
            ControlKind::from_input_type(input_type.as_deref())
        }
        Route::Expand => return Ok(None),
    };

    let id = automation.attribute(element, "id")?;
    let name = non_empty(automation.attribute(element, "name")?);

    Ok(Some(Control {
        element: element.clone(),
        kind,
        key: control_key(id, name.clone()),
        name,
    }))
}
