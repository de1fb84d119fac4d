use serde::Serialize;

use crate::{
    browser::automation::Automation,
    data::{
        generator::{DataGenerator, RandomGenerator},
        lookup::{JsonLookup, StructuredLookup},
    },
    fill::{
        error::FillError,
        resolver::ValueResolver,
        seed::Seed,
        session::{FillSession, ThenSubmit},
    },
    trace::logger::TraceLogger,
};

/// Entry point for filling forms.
///
/// Owns the injected collaborators (generator, lookup, optional trace) and
/// runs one [`FillSession`] per call.
///
/// ```no_run
/// use form_autofill::{AutoFiller, MemoryPage, FormFixture, Seed};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let fixture = FormFixture::load("signup.yaml")?;
/// let mut page = MemoryPage::from_fixture(&fixture);
/// let roots = page.roots().to_vec();
///
/// let mut filler = AutoFiller::seeded(42);
/// filler.fill(&mut page, &roots, &Seed::Null)?.submit()?;
/// # Ok(())
/// # }
/// ```
pub struct AutoFiller {
    generator: Box<dyn DataGenerator>,
    lookup: Box<dyn StructuredLookup>,
    tracer: Option<TraceLogger>,
}

impl AutoFiller {
    /// Create a filler around a custom generator, with JSON field lookup.
    pub fn new(generator: Box<dyn DataGenerator>) -> Self {
        Self {
            generator,
            lookup: Box::new(JsonLookup),
            tracer: None,
        }
    }

    /// Create a filler with a reproducible random generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(Box::new(RandomGenerator::seeded(seed)))
    }

    /// Create a filler with an entropy-seeded random generator.
    pub fn with_entropy() -> Self {
        Self::new(Box::new(RandomGenerator::from_entropy()))
    }

    pub fn with_lookup(mut self, lookup: Box<dyn StructuredLookup>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Fill `elements` (controls or containers of controls) from `seed`.
    pub fn fill<'a, A: Automation>(
        &mut self,
        automation: &'a mut A,
        elements: &[A::Element],
        seed: &Seed,
    ) -> Result<ThenSubmit<'a, A>, FillError> {
        if elements.is_empty() {
            return Err(FillError::NoElements { selector: None });
        }

        let resolver = ValueResolver::new(seed, self.lookup.as_ref());
        FillSession::new(automation, resolver, self.generator.as_mut(), self.tracer.as_ref())
            .run(elements)
    }

    /// Fill every element matching `selector`.
    pub fn fill_selector<'a, A: Automation>(
        &mut self,
        automation: &'a mut A,
        selector: &str,
        seed: &Seed,
    ) -> Result<ThenSubmit<'a, A>, FillError> {
        let elements = automation.find_all(selector)?;
        if elements.is_empty() {
            return Err(FillError::NoElements {
                selector: Some(selector.to_string()),
            });
        }
        self.fill(automation, &elements, seed)
    }

    /// Fill `elements` from the fields of a typed model.
    pub fn fill_as<'a, A: Automation, T: Serialize>(
        &mut self,
        automation: &'a mut A,
        elements: &[A::Element],
        model: &T,
    ) -> Result<ThenSubmit<'a, A>, FillError> {
        if elements.is_empty() {
            return Err(FillError::NoElements { selector: None });
        }
        let seed = Seed::from_model(model)?;
        self.fill(automation, elements, &seed)
    }
}
