//! System-instruction template with a declared parameter schema.
//!
//! Placeholders are written `{name}`; `{{` and `}}` produce literal braces. Every placeholder
//! must be declared with a [`ParamSpec`] when the template is built, and every declared
//! parameter must appear in the instruction. Values are checked against the declared
//! [`ParamKind`] when rendering.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::ChatMessage;

/// Errors raised while building or rendering a [`PromptTemplate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Placeholder '{{{0}}}' is not a declared parameter")]
    UndeclaredPlaceholder(String),

    #[error("Declared parameter '{0}' does not appear in the instruction")]
    UnusedParameter(String),

    #[error("Parameter '{0}' is declared more than once")]
    DuplicateParameter(String),

    #[error("Unbalanced brace at byte {0} of the instruction")]
    UnbalancedBrace(usize),

    #[error("History slot name is empty")]
    EmptyHistorySlot,

    #[error("Unknown template parameter: {0}")]
    UnknownParameter(String),

    #[error("Missing template parameter: {0}")]
    MissingParameter(String),

    #[error("Template parameter '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        found: ParamKind,
    },
}

/// Value type accepted by a template parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Integer,
    Float,
    Bool,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Text => "text",
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Declaration of one accepted placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Text)
    }
}

/// A value supplied for a placeholder at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_) => ParamKind::Bool,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Integer(n) => write!(f, "{}", n),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Name → value mapping passed to [`PromptTemplate::render_instruction`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateParams {
    values: BTreeMap<String, ParamValue>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a value, returning the previous one for that name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A system instruction with named placeholders plus the name of the slot that receives
/// the conversation messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
    params: Vec<ParamSpec>,
    history_slot: String,
}

impl PromptTemplate {
    /// Parses `system_instruction` and checks its placeholders against `params`.
    ///
    /// Fails when a placeholder is not declared, a declared parameter is never used,
    /// a name is declared twice, braces are unbalanced, or `history_slot` is blank.
    pub fn new<P>(
        system_instruction: &str,
        history_slot: impl Into<String>,
        params: P,
    ) -> Result<Self, TemplateError>
    where
        P: IntoIterator<Item = ParamSpec>,
    {
        let history_slot = history_slot.into();
        if history_slot.trim().is_empty() {
            return Err(TemplateError::EmptyHistorySlot);
        }

        let mut declared: Vec<ParamSpec> = Vec::new();
        for spec in params {
            if declared.iter().any(|d| d.name == spec.name) {
                return Err(TemplateError::DuplicateParameter(spec.name));
            }
            declared.push(spec);
        }

        let segments = parse_segments(system_instruction)?;
        let mut used: HashSet<&str> = HashSet::new();
        for segment in &segments {
            if let Segment::Placeholder(name) = segment {
                if !declared.iter().any(|d| &d.name == name) {
                    return Err(TemplateError::UndeclaredPlaceholder(name.clone()));
                }
                used.insert(name.as_str());
            }
        }
        if let Some(unused) = declared.iter().find(|d| !used.contains(d.name.as_str())) {
            return Err(TemplateError::UnusedParameter(unused.name.clone()));
        }

        Ok(Self {
            segments,
            params: declared,
            history_slot,
        })
    }

    /// Name of the slot the conversation messages are injected into.
    pub fn history_slot(&self) -> &str {
        &self.history_slot
    }

    /// Declared parameters, in declaration order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Substitutes `params` into the system instruction.
    pub fn render_instruction(&self, params: &TemplateParams) -> Result<String, TemplateError> {
        if let Some((name, _)) = params
            .iter()
            .find(|(name, _)| !self.params.iter().any(|d| d.name == *name))
        {
            return Err(TemplateError::UnknownParameter(name.to_string()));
        }
        for spec in &self.params {
            let value = params
                .get(&spec.name)
                .ok_or_else(|| TemplateError::MissingParameter(spec.name.clone()))?;
            if value.kind() != spec.kind {
                return Err(TemplateError::TypeMismatch {
                    name: spec.name.clone(),
                    expected: spec.kind,
                    found: value.kind(),
                });
            }
        }

        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    // Presence checked above.
                    if let Some(value) = params.get(name) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        Ok(out)
    }

    /// Builds the full message sequence: the rendered system instruction, then `history`,
    /// then `new_messages`, in that order.
    pub fn format_messages(
        &self,
        params: &TemplateParams,
        history: &[ChatMessage],
        new_messages: &[ChatMessage],
    ) -> Result<Vec<ChatMessage>, TemplateError> {
        let instruction = self.render_instruction(params)?;
        let mut messages = Vec::with_capacity(1 + history.len() + new_messages.len());
        messages.push(ChatMessage::system(instruction));
        messages.extend(history.iter().cloned());
        messages.extend(new_messages.iter().cloned());
        Ok(messages)
    }
}

fn parse_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                let mut name = String::new();
                let mut closed = false;
                for (_, n) in chars.by_ref() {
                    match n {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnbalancedBrace(pos)),
                        other => name.push(other),
                    }
                }
                let name = name.trim();
                if !closed || name.is_empty() {
                    return Err(TemplateError::UnbalancedBrace(pos));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(name.to_string()));
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    literal.push('}');
                } else {
                    return Err(TemplateError::UnbalancedBrace(pos));
                }
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
