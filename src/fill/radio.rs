use std::collections::HashMap;

/// Radio controls sharing one input name, in discovery order.
#[derive(Debug, Clone)]
pub struct RadioGroup<E> {
    pub name: String,
    pub members: Vec<E>,
}

/// Collects radio controls by name while discovery runs.
///
/// Groups are only handed out through [`RadioGroups::finish`], so nothing
/// can resolve a group before every member has been seen.
#[derive(Debug)]
pub struct RadioGroups<E> {
    groups: Vec<RadioGroup<E>>,
    index: HashMap<String, usize>,
}

impl<E> Default for RadioGroups<E> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E> RadioGroups<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a radio to its group. Radios without a name cannot be grouped
    /// and are dropped; returns whether the radio was kept.
    pub fn add(&mut self, name: Option<&str>, element: E) -> bool {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return false;
        };

        let slot = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.groups.push(RadioGroup {
                    name: name.to_string(),
                    members: Vec::new(),
                });
                self.index.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        self.groups[slot].members.push(element);
        true
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Close discovery and return the groups in first-seen order.
    pub fn finish(self) -> Vec<RadioGroup<E>> {
        self.groups
    }
}
