use std::cell::RefCell;
use std::rc::Rc;

use form_autofill::{
    AutoFiller, DataGenerator, MemoryPage, NodeId, NodeSpec, StringKind,
    browser::memory::Call,
};

/// Generator with fixed, observable answers.
///
/// Strings are `gen:<request key>`, booleans are `flag`, and picks return
/// `index` (or nothing when `index` is `None` or out of range).
#[derive(Clone)]
pub struct ScriptedGenerator {
    pub flag: bool,
    pub index: Option<usize>,
    pub string_requests: Rc<RefCell<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            flag: false,
            index: Some(0),
            string_requests: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_flag(mut self, flag: bool) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_index(mut self, index: Option<usize>) -> Self {
        self.index = index;
        self
    }
}

impl DataGenerator for ScriptedGenerator {
    fn next_index(&mut self, len: usize) -> Option<usize> {
        self.index.filter(|i| *i < len)
    }

    fn generate_string(&mut self, request_key: &str, _kind: StringKind) -> String {
        self.string_requests.borrow_mut().push(request_key.to_string());
        format!("gen:{}", request_key)
    }

    fn generate_bool(&mut self) -> bool {
        self.flag
    }
}

pub fn scripted_filler(generator: ScriptedGenerator) -> AutoFiller {
    AutoFiller::new(Box::new(generator))
}

/// Page with a single root built from `spec`.
pub fn page_with(spec: NodeSpec) -> (MemoryPage, NodeId) {
    let mut page = MemoryPage::new();
    let root = page.add_root(&spec);
    (page, root)
}

pub fn node(page: &MemoryPage, html_id: &str) -> NodeId {
    page.by_id(html_id)
        .unwrap_or_else(|| panic!("no node with id '{}'", html_id))
}

pub fn clicks(page: &MemoryPage) -> usize {
    page.calls()
        .iter()
        .filter(|c| matches!(c, Call::Click(_)))
        .count()
}

/// A signup form exercising every control kind.
pub fn signup_form() -> NodeSpec {
    NodeSpec::new("form")
        .id("signup")
        .child(NodeSpec::input("text").id("first_name").name("first_name"))
        .child(NodeSpec::input("email").id("email"))
        .child(NodeSpec::new("textarea").id("bio"))
        .child(
            NodeSpec::new("select")
                .id("country")
                .option("", "Choose a country")
                .option("us", "United States")
                .option("ca", "Canada"),
        )
        .child(NodeSpec::input("checkbox").id("newsletter"))
        .child(NodeSpec::input("radio").id("plan_free").name("plan").value("free"))
        .child(NodeSpec::input("radio").id("plan_pro").name("plan").value("pro"))
        .child(NodeSpec::input("hidden").id("csrf").value("token"))
        .child(NodeSpec::input("submit").id("go").value("Sign up"))
}
