use std::{collections::BTreeMap, fmt, io, sync::Arc};

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DaeError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<DaeCause>,
}

#[derive(Debug, Clone)]
pub enum DaeCause {
    Dae(Box<DaeError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl DaeError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_dae(mut self, cause: DaeError) -> Self {
        self.causes.push(DaeCause::Dae(Box::new(cause)));
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(DaeCause::Std(Arc::new(cause)));
        self
    }

    /// Value of an argument attached with [`DaeError::with_arg`].
    pub fn arg(&self, k: &str) -> Option<&str> {
        self.args.get(k).map(String::as_str)
    }
}

impl fmt::Display for DaeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")
    }
}

impl std::error::Error for DaeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            DaeCause::Dae(e) => Some(e.as_ref() as &dyn std::error::Error),
            DaeCause::Std(e) => Some(e.as_ref()),
        })
    }
}

/// Line-level failures of the markup reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("unexpected end of input after line {line}")]
    UnexpectedEof { line: usize },
    #[error("line {line} does not hold a single tag: {text:?}")]
    MissingTag { line: usize, text: String },
}

impl MarkupError {
    pub fn line(&self) -> usize {
        match self {
            MarkupError::UnexpectedEof { line } => *line,
            MarkupError::MissingTag { line, .. } => *line,
        }
    }
}

impl From<MarkupError> for DaeError {
    fn from(err: MarkupError) -> Self {
        DaeError::new("markup-error")
            .with_arg("line", err.line())
            .push_std(err)
    }
}

impl From<io::Error> for DaeError {
    fn from(err: io::Error) -> Self {
        DaeError::new("io-error").push_std(err)
    }
}
