//! Generic element tree handed to the writer, plus the attribute list
//! shared by every node kind.

/// Ordered attribute list that drops absent and empty values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value. Empty values are omitted.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn set_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.set(key, value.to_string());
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_opt<T: ToString>(mut self, key: &'static str, value: Option<T>) -> Self {
        self.set_opt(key, value);
        self
    }

    /// Copy every attribute of `other` over this list
    pub fn merge(&mut self, other: &Attrs) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str, attrs: Attrs) -> Self {
        Self { tag, attrs, children: Vec::new() }
    }

    /// Element whose only content is `text`
    pub fn text(tag: &'static str, attrs: Attrs, text: &str) -> Self {
        let mut element = Self::new(tag, attrs);
        if !text.is_empty() {
            element.children.push(Node::Text(text.to_string()));
        }
        element
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}
