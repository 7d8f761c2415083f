/// Session-local shell variables.
///
/// Entries are appended and never replaced, so a name that was assigned
/// more than once keeps resolving to its first value.
#[derive(Clone, Debug, Default)]
pub struct VariableStore {
    vars: Vec<(Box<str>, Box<str>)>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.vars.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
