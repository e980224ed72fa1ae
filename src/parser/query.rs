use crate::error::DaeError;
use crate::parser::node::MarkupNode;
use std::str::FromStr;

/// A node plus the tree path that led to it, so failed lookups can say where.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    node: &'a MarkupNode,
    path: String,
}

impl<'a> NodeRef<'a> {
    pub fn root(node: &'a MarkupNode) -> Self {
        Self {
            node,
            path: node.name.clone(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn descend(&self, node: &'a MarkupNode, step: String) -> Self {
        Self {
            node,
            path: format!("{}/{}", self.path, step),
        }
    }

    pub fn child(&self, name: &str) -> Result<NodeRef<'a>, DaeError> {
        match self.node.child(name) {
            Some(child) => Ok(self.descend(child, name.to_string())),
            None => Err(DaeError::new("missing-child")
                .with_arg("path", &self.path)
                .with_arg("child", name)),
        }
    }

    pub fn children(&self, name: &str) -> Vec<NodeRef<'a>> {
        self.node
            .children(name)
            .iter()
            .enumerate()
            .map(|(i, child)| self.descend(child, format!("{name}[{i}]")))
            .collect()
    }

    pub fn child_with_attribute(
        &self,
        name: &str,
        attr: &str,
        value: &str,
    ) -> Result<NodeRef<'a>, DaeError> {
        let step = format!("{name}[@{attr}={value}]");
        match self.node.child_with_attribute(name, attr, value) {
            Some(child) => Ok(self.descend(child, step)),
            None => Err(DaeError::new("missing-child")
                .with_arg("path", &self.path)
                .with_arg("child", step)),
        }
    }

    pub fn attribute(&self, attr: &str) -> Result<&'a str, DaeError> {
        self.node.attribute(attr).ok_or_else(|| {
            DaeError::new("missing-attribute")
                .with_arg("path", &self.path)
                .with_arg("attribute", attr)
        })
    }

    pub fn data(&self) -> Result<&'a str, DaeError> {
        self.node
            .data()
            .ok_or_else(|| DaeError::new("missing-data").with_arg("path", &self.path))
    }

    /// The `source` attribute without its leading `#`.
    pub fn source_id(&self) -> Result<&'a str, DaeError> {
        let source = self.attribute("source")?;
        Ok(source.strip_prefix('#').unwrap_or(source))
    }

    /// Numeric `count` attribute.
    pub fn count(&self) -> Result<usize, DaeError> {
        let raw = self.attribute("count")?;
        raw.parse().map_err(|e| {
            DaeError::new("invalid-number")
                .with_arg("path", format!("{}@count", self.path))
                .with_arg("value", raw)
                .push_std(e)
        })
    }

    /// Whitespace separated data tokens; no data reads as an empty list.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> {
        self.node.data().unwrap_or("").split_whitespace()
    }

    pub fn names(&self) -> Vec<String> {
        self.tokens().map(str::to_string).collect()
    }

    pub fn numbers<T>(&self) -> Result<Vec<T>, DaeError>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.tokens()
            .enumerate()
            .map(|(i, token)| {
                token.parse::<T>().map_err(|e| {
                    DaeError::new("invalid-number")
                        .with_arg("path", &self.path)
                        .with_arg("token", i)
                        .with_arg("value", token)
                        .push_std(e)
                })
            })
            .collect()
    }

    pub fn floats(&self) -> Result<Vec<f32>, DaeError> {
        self.numbers()
    }

    pub fn ints(&self) -> Result<Vec<u32>, DaeError> {
        self.numbers()
    }
}

/// Error for an index that points past the end of a list read at `path`.
pub(crate) fn out_of_range(path: &str, what: &str, index: impl ToString, len: usize) -> DaeError {
    DaeError::new("index-out-of-range")
        .with_arg("path", path)
        .with_arg("what", what)
        .with_arg("index", index)
        .with_arg("len", len)
}
