use tracing::{debug, info};

use crate::{
    browser::{automation::Automation, error::AutomationError},
    data::generator::{DataGenerator, StringKind, pick_one},
    fill::{
        applicator::{OptionMatch, click_radio, fill_text, select_matching, select_random, set_checked},
        control::{Control, ControlKind, FILLABLE_SELECTOR, classify_control},
        error::FillError,
        radio::{RadioGroup, RadioGroups},
        resolver::{FillDecision, Provenance, ValueResolver},
        seed::SeedMode,
    },
    trace::{logger::TraceLogger, trace::FillEvent},
};

/// Phases of a fill session, entered strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FillPhase {
    Start,
    Discover,
    ApplyLeaves,
    ResolveRadioGroups,
    Done,
}

/// Everything found in the discovery pass.
#[derive(Debug)]
pub struct Discovery<E> {
    /// Non-radio controls in discovery order.
    pub leaves: Vec<Control<E>>,
    pub radio_groups: RadioGroups<E>,
}

/// Walk the caller's elements once. Controls are kept as leaves (radios go
/// to their group); anything else is expanded one level into its fillable
/// descendants, or skipped if it has none.
pub fn discover<A: Automation>(
    automation: &mut A,
    elements: &[A::Element],
) -> Result<Discovery<A::Element>, AutomationError> {
    let mut discovery = Discovery {
        leaves: Vec::new(),
        radio_groups: RadioGroups::new(),
    };

    for element in elements {
        if let Some(control) = classify_control(automation, element)? {
            discovery.collect(control);
            continue;
        }

        let descendants = automation.find_descendants(element, FILLABLE_SELECTOR)?;
        if descendants.is_empty() {
            debug!("skipping {:?}: not a control and no fillable descendants", element);
        }

        for descendant in &descendants {
            if let Some(control) = classify_control(automation, descendant)? {
                discovery.collect(control);
            }
        }
    }

    Ok(discovery)
}

impl<E> Discovery<E> {
    fn collect(&mut self, control: Control<E>) {
        if control.kind == ControlKind::Radio {
            if !self.radio_groups.add(control.name.as_deref(), control.element) {
                debug!("dropping radio without a name");
            }
        } else {
            self.leaves.push(control);
        }
    }
}

/// Continuation returned by a finished fill: the only follow-up offered is
/// submitting the form through the first element of the fill.
pub struct ThenSubmit<'a, A: Automation> {
    automation: &'a mut A,
    anchor: A::Element,
}

impl<'a, A: Automation> ThenSubmit<'a, A> {
    pub fn submit(self) -> Result<(), AutomationError> {
        info!("submitting form via {:?}", self.anchor);
        self.automation.submit(&self.anchor)
    }
}

/// One pass over a collection of elements.
///
/// Discovery runs to completion before anything is written, leaves are
/// applied in discovery order, and radio groups are resolved last. The first
/// automation failure aborts the pass.
pub struct FillSession<'s, 'a, A: Automation> {
    automation: &'a mut A,
    resolver: ValueResolver<'s>,
    generator: &'s mut dyn DataGenerator,
    tracer: Option<&'s TraceLogger>,
    phase: FillPhase,
    step: u64,
}

impl<'s, 'a, A: Automation> FillSession<'s, 'a, A> {
    pub fn new(
        automation: &'a mut A,
        resolver: ValueResolver<'s>,
        generator: &'s mut dyn DataGenerator,
        tracer: Option<&'s TraceLogger>,
    ) -> Self {
        Self {
            automation,
            resolver,
            generator,
            tracer,
            phase: FillPhase::Start,
            step: 0,
        }
    }

    pub fn run(mut self, elements: &[A::Element]) -> Result<ThenSubmit<'a, A>, FillError> {
        let Some(anchor) = elements.first().cloned() else {
            return Err(FillError::NoElements { selector: None });
        };

        info!(
            "autofill: {} element(s), {:?} seed",
            elements.len(),
            self.resolver.mode()
        );

        self.enter(FillPhase::Discover);
        let discovery = discover(&mut *self.automation, elements)?;

        self.enter(FillPhase::ApplyLeaves);
        for control in &discovery.leaves {
            self.apply(control)?;
        }

        let groups = discovery.radio_groups.finish();
        self.enter(FillPhase::ResolveRadioGroups);
        for group in &groups {
            self.resolve_group(group)?;
        }

        self.enter(FillPhase::Done);
        info!(
            "autofill complete: {} control(s), {} radio group(s)",
            discovery.leaves.len(),
            groups.len()
        );

        Ok(ThenSubmit {
            automation: self.automation,
            anchor,
        })
    }

    fn enter(&mut self, phase: FillPhase) {
        debug_assert!(phase > self.phase, "fill phases must advance");
        debug!("fill phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn trace(&mut self, build: impl FnOnce(FillEvent) -> FillEvent) {
        if let Some(tracer) = self.tracer {
            tracer.log(&build(FillEvent::now(self.step, self.phase)));
        }
        self.step += 1;
    }

    fn apply(&mut self, control: &Control<A::Element>) -> Result<(), AutomationError> {
        match control.kind {
            ControlKind::TextLike => self.apply_text(control),
            ControlKind::Checkbox => self.apply_checkbox(control),
            ControlKind::Select => self.apply_select(control),
            ControlKind::Hidden | ControlKind::Submit => {
                debug!("skipping {:?} control {:?}", control.kind, control.key());
                self.trace(|e| e.with_control(control.kind, control.key()).with_action("skip"));
                Ok(())
            }
            // grouped during discovery
            ControlKind::Radio => Ok(()),
        }
    }

    fn apply_text(&mut self, control: &Control<A::Element>) -> Result<(), AutomationError> {
        let decision = match self.resolver.resolve(control.key()) {
            Some(decision) => decision,
            None => FillDecision::generated(
                self.generator
                    .generate_string(control.key().unwrap_or_default(), StringKind::AlphaNumeric),
            ),
        };

        debug!(
            "fill {:?} = {:?} ({:?})",
            control.key(),
            decision.value,
            decision.provenance
        );
        fill_text(&mut *self.automation, &control.element, &decision.value)?;

        self.trace(|e| {
            e.with_control(control.kind, control.key())
                .with_action("send_keys")
                .with_value(&decision.value)
                .with_provenance(decision.provenance)
        });
        Ok(())
    }

    fn apply_checkbox(&mut self, control: &Control<A::Element>) -> Result<(), AutomationError> {
        let (wanted, provenance) = match self.resolver.resolve_flag(control.key()) {
            Some(flag) => (flag, Provenance::SeedLookup),
            None => (self.generator.generate_bool(), Provenance::Generated),
        };

        let clicked = set_checked(&mut *self.automation, &control.element, wanted)?;
        debug!(
            "checkbox {:?} -> {} ({:?}, clicked: {})",
            control.key(),
            wanted,
            provenance,
            clicked
        );

        self.trace(|e| {
            e.with_control(control.kind, control.key())
                .with_action(if clicked { "click" } else { "unchanged" })
                .with_value(wanted)
                .with_provenance(provenance)
        });
        Ok(())
    }

    fn apply_select(&mut self, control: &Control<A::Element>) -> Result<(), AutomationError> {
        let options = self.automation.options(&control.element)?;

        // A simple seed never targets an option directly; it takes the random
        // fallback below rather than leaving the select untouched.
        if self.resolver.mode() == SeedMode::Structured {
            if let Some(decision) = self.resolver.resolve(control.key()) {
                let matched =
                    select_matching(&mut *self.automation, &control.element, &options, &decision.value)?;

                if let Some(matched) = matched {
                    let action = match &matched {
                        OptionMatch::Value(_) => "select_by_value",
                        OptionMatch::Text(_) => "select_by_text",
                    };
                    debug!("select {:?} {} {:?}", control.key(), action, decision.value);
                    self.trace(|e| {
                        e.with_control(control.kind, control.key())
                            .with_action(action)
                            .with_value(&decision.value)
                            .with_provenance(decision.provenance)
                    });
                    return Ok(());
                }

                debug!(
                    "select {:?}: no option matches {:?}, picking one",
                    control.key(),
                    decision.value
                );
            }
        }

        match select_random(&mut *self.automation, &control.element, &options, self.generator)? {
            Some(value) => {
                debug!("select {:?} picked {:?}", control.key(), value);
                self.trace(|e| {
                    e.with_control(control.kind, control.key())
                        .with_action("select_by_value")
                        .with_value(&value)
                        .with_provenance(Provenance::Generated)
                });
            }
            None => {
                debug!("select {:?}: no option with a value", control.key());
                self.trace(|e| e.with_control(control.kind, control.key()).with_action("none"));
            }
        }
        Ok(())
    }

    fn resolve_group(&mut self, group: &RadioGroup<A::Element>) -> Result<(), AutomationError> {
        let wanted = self
            .resolver
            .resolve(Some(group.name.as_str()))
            .filter(|d| !d.value.is_empty());

        if let Some(decision) = wanted {
            for member in &group.members {
                let value = self.automation.attribute(member, "value")?;
                if value.as_deref() == Some(decision.value.as_str()) {
                    click_radio(&mut *self.automation, member)?;
                    debug!("radio {:?} = {:?} ({:?})", group.name, decision.value, decision.provenance);
                    self.trace(|e| {
                        e.with_control(ControlKind::Radio, Some(group.name.as_str()))
                            .with_action("click")
                            .with_value(&decision.value)
                            .with_provenance(decision.provenance)
                    });
                    return Ok(());
                }
            }
        }

        match pick_one(self.generator, &group.members) {
            Some(member) => {
                click_radio(&mut *self.automation, member)?;
                debug!("radio {:?} picked {:?}", group.name, member);
                self.trace(|e| {
                    e.with_control(ControlKind::Radio, Some(group.name.as_str()))
                        .with_action("click")
                        .with_provenance(Provenance::Generated)
                });
            }
            None => {
                debug!("radio {:?} left unselected", group.name);
                self.trace(|e| e.with_control(ControlKind::Radio, Some(group.name.as_str())).with_action("none"));
            }
        }
        Ok(())
    }
}
