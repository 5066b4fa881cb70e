use indexmap::IndexMap;

/// Attribute carrying the interaction key of a node.
pub const KEY_ATTR: &str = "data-key";

/// One element of the vector scene graph.
///
/// Attributes keep insertion order so exported markup is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SvgNode {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<SvgNode>,
    pub text: Option<String>,
}

impl SvgNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.insert(name.into(), value.to_string());
        self
    }

    #[must_use]
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    /// Tags the node so pointer input on it can be resolved to data.
    #[must_use]
    pub fn key(self, key: impl Into<String>) -> Self {
        self.attr(KEY_ATTR, key.into())
    }

    #[must_use]
    pub fn child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = SvgNode>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl ToString) {
        self.attrs.insert(name.into(), value.to_string());
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    pub fn push(&mut self, child: SvgNode) {
        self.children.push(child);
    }

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn interaction_key(&self) -> Option<&str> {
        self.get_attr(KEY_ATTR)
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|name| name == class))
    }

    /// Depth-first search for the node tagged with `key`.
    #[must_use]
    pub fn find_by_key(&self, key: &str) -> Option<&SvgNode> {
        if self.interaction_key() == Some(key) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_key(key))
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut SvgNode> {
        if self.interaction_key() == Some(key) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_key_mut(key))
    }

    /// First direct or nested child carrying `class`.
    #[must_use]
    pub fn find_by_class(&self, class: &str) -> Option<&SvgNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_by_class(class))
    }

    pub fn find_by_class_mut(&mut self, class: &str) -> Option<&mut SvgNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_class_mut(class))
    }

    /// Every node in the subtree carrying `class`.
    #[must_use]
    pub fn collect_by_class(&self, class: &str) -> Vec<&SvgNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.has_class(class) {
                found.push(node);
            }
        });
        found
    }

    #[must_use]
    pub fn count_tag(&self, tag: &str) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            if node.tag == tag {
                count += 1;
            }
        });
        count
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SvgNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}
