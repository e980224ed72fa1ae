use std::collections::HashMap;

/// One element of a markup document.
///
/// Children are grouped by tag name; order inside a group follows the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupNode {
    pub name: String,
    data: Option<String>,
    attributes: HashMap<String, String>,
    children: HashMap<String, Vec<MarkupNode>>,
}

impl MarkupNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = Some(data.into());
    }

    pub fn attribute(&self, attr: &str) -> Option<&str> {
        self.attributes.get(attr).map(String::as_str)
    }

    pub fn add_attribute(&mut self, attr: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(attr.into(), value.into());
    }

    /// First child registered under `name`.
    pub fn child(&self, name: &str) -> Option<&MarkupNode> {
        self.children.get(name).and_then(|nodes| nodes.first())
    }

    /// All children registered under `name`, in document order.
    pub fn children(&self, name: &str) -> &[MarkupNode] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn child_with_attribute(&self, name: &str, attr: &str, value: &str) -> Option<&MarkupNode> {
        self.children(name)
            .iter()
            .find(|c| c.attribute(attr) == Some(value))
    }

    pub fn add_child(&mut self, child: MarkupNode) {
        self.children
            .entry(child.name.clone())
            .or_default()
            .push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(semantic: &str, source: &str) -> MarkupNode {
        let mut node = MarkupNode::new("input");
        node.add_attribute("semantic", semantic);
        node.add_attribute("source", source);
        node
    }

    #[test]
    fn same_named_children_keep_insertion_order() {
        let mut parent = MarkupNode::new("polylist");
        parent.add_child(input("VERTEX", "#a"));
        parent.add_child(MarkupNode::new("p"));
        parent.add_child(input("NORMAL", "#b"));

        let inputs = parent.children("input");
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].attribute("source"), Some("#a"));
        assert_eq!(inputs[1].attribute("source"), Some("#b"));
        assert_eq!(parent.child("input").unwrap().attribute("semantic"), Some("VERTEX"));
        assert!(parent.child("p").is_some());
    }

    #[test]
    fn missing_lookups_return_none_or_empty() {
        let node = MarkupNode::new("mesh");
        assert!(node.child("source").is_none());
        assert!(node.children("source").is_empty());
        assert!(node.attribute("id").is_none());
        assert!(node.data().is_none());
        assert!(node.child_with_attribute("input", "semantic", "JOINT").is_none());
    }

    #[test]
    fn child_with_attribute_returns_first_match() {
        let mut parent = MarkupNode::new("vertex_weights");
        parent.add_child(input("JOINT", "#joints"));
        parent.add_child(input("WEIGHT", "#weights"));
        parent.add_child(input("WEIGHT", "#other"));

        let found = parent
            .child_with_attribute("input", "semantic", "WEIGHT")
            .unwrap();
        assert_eq!(found.attribute("source"), Some("#weights"));
        assert!(parent.child_with_attribute("input", "semantic", "OUTPUT").is_none());
    }

    #[test]
    fn attribute_overwrites_previous_value() {
        let mut node = MarkupNode::new("float_array");
        node.add_attribute("count", "3");
        node.add_attribute("count", "6");
        assert_eq!(node.attribute("count"), Some("6"));
    }
}
