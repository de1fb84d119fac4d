use crate::browser::automation::{Automation, SelectOption};
use crate::browser::error::AutomationError;
use crate::data::generator::{DataGenerator, pick_one};

/// Replace the contents of a text-like control.
pub fn fill_text<A: Automation>(
    automation: &mut A,
    element: &A::Element,
    text: &str,
) -> Result<(), AutomationError> {
    automation.clear(element)?;
    automation.send_keys(element, text)
}

/// Bring a checkbox to the wanted state. Clicks only when the current state
/// differs; returns whether a click happened.
pub fn set_checked<A: Automation>(
    automation: &mut A,
    element: &A::Element,
    wanted: bool,
) -> Result<bool, AutomationError> {
    if automation.is_selected(element)? == wanted {
        return Ok(false);
    }
    automation.click(element)?;
    Ok(true)
}

pub fn click_radio<A: Automation>(
    automation: &mut A,
    element: &A::Element,
) -> Result<(), AutomationError> {
    automation.click(element)
}

/// How a seed value matched a select option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionMatch {
    Value(String),
    Text(String),
}

/// Match against option values first, then against display texts.
pub fn match_option(options: &[SelectOption], wanted: &str) -> Option<OptionMatch> {
    if options.iter().any(|o| o.value == wanted) {
        return Some(OptionMatch::Value(wanted.to_string()));
    }
    if options.iter().any(|o| o.text == wanted) {
        return Some(OptionMatch::Text(wanted.to_string()));
    }
    None
}

/// Select the option matching `wanted`, if any.
pub fn select_matching<A: Automation>(
    automation: &mut A,
    element: &A::Element,
    options: &[SelectOption],
    wanted: &str,
) -> Result<Option<OptionMatch>, AutomationError> {
    let Some(matched) = match_option(options, wanted) else {
        return Ok(None);
    };

    match &matched {
        OptionMatch::Value(v) => automation.select_by_value(element, v)?,
        OptionMatch::Text(t) => automation.select_by_text(element, t)?,
    }

    Ok(Some(matched))
}

/// Select a generator-picked option among those with a non-empty value.
/// Returns the selected value, `None` when nothing was picked.
pub fn select_random<A: Automation>(
    automation: &mut A,
    element: &A::Element,
    options: &[SelectOption],
    generator: &mut dyn DataGenerator,
) -> Result<Option<String>, AutomationError> {
    let candidates: Vec<&SelectOption> = options.iter().filter(|o| !o.value.is_empty()).collect();

    let Some(option) = pick_one(generator, &candidates) else {
        return Ok(None);
    };

    automation.select_by_value(element, &option.value)?;
    Ok(Some(option.value.clone()))
}
