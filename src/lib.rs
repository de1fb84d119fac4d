//! Heuristic form autofill for browser-based UI tests.
//!
//! Given form controls (or containers of controls) and an optional seed, the
//! engine decides a value for every control and applies it through an
//! [`Automation`] backend: text is typed, options selected, checkboxes
//! toggled and one radio per group clicked. Fields the seed does not cover
//! get generated data from an injected [`DataGenerator`].

pub mod browser;
pub mod cli;
pub mod data;
pub mod fill;
pub mod report;
pub mod trace;

pub use browser::{
    automation::{Automation, SelectOption},
    error::AutomationError,
    memory::{FormFixture, MemoryPage, NodeId, NodeSpec},
    session::BrowserSession,
};
pub use data::{
    generator::{DataGenerator, RandomGenerator, StringKind},
    lookup::{JsonLookup, StructuredLookup},
};
pub use fill::{
    autofill::AutoFiller,
    error::FillError,
    seed::{Seed, SeedMode},
    session::ThenSubmit,
};
