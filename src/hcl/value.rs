//! Structured HCL values, bodies and blocks.
//!
//! Declarations are built from these types and only turned into text by the
//! renderer, so cross-references stay typed until the very end.

use indexmap::IndexMap;
use std::fmt;

/// One step of an attribute path after `<kind>.<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// `.attr`
    Attr(String),
    /// `[0]`
    Index(usize),
}

/// A structured reference to another declaration: `<kind>.<name>[.<path>]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub kind: String,
    pub name: String,
    pub path: Vec<PathSegment>,
}

impl Reference {
    /// Reference to a declaration as a whole (used in `depends_on`).
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            path: Vec::new(),
        }
    }

    /// Append an attribute step.
    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.path.push(PathSegment::Attr(attr.into()));
        self
    }

    /// Append an index step.
    pub fn index(mut self, index: usize) -> Self {
        self.path.push(PathSegment::Index(index));
        self
    }

    /// `<kind>.<name>`, the address of the referenced declaration.
    pub fn address(&self) -> String {
        format!("{}.{}", self.kind, self.name)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name)?;
        for segment in &self.path {
            match segment {
                PathSegment::Attr(attr) => write!(f, ".{}", attr)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Piece of an interpolated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart {
    /// Literal text, escaped on render
    Literal(String),
    /// `${var.<name>}`
    Variable(String),
}

/// A quoted string mixing literal text with variable interpolations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    parts: Vec<TemplatePart>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text.
    pub fn lit(mut self, text: impl Into<String>) -> Self {
        self.parts.push(TemplatePart::Literal(text.into()));
        self
    }

    /// Append a variable interpolation.
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.parts.push(TemplatePart::Variable(name.into()));
        self
    }

    pub fn parts(&self) -> &[TemplatePart] {
        &self.parts
    }

    /// Names of all interpolated variables.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            TemplatePart::Variable(name) => Some(name.as_str()),
            TemplatePart::Literal(_) => None,
        })
    }
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted literal, escaped on render
    String(String),
    Number(i64),
    Float(f64),
    Bool(bool),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// Reference to another declaration
    Reference(Reference),
    /// `var.<name>`
    Variable(String),
    /// `var.<name>["<key>"]`
    VariableKey(String, String),
    /// Interpolated string
    Template(Template),
    /// Bare type constraint in variable declarations, e.g. `map(string)`
    TypeConstraint(&'static str),
}

impl Value {
    /// Quoted string literal.
    pub fn str(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// `var.<name>`
    pub fn var(name: impl Into<String>) -> Self {
        Value::Variable(name.into())
    }

    /// List of quoted string literals.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    /// Map of quoted string literals.
    pub fn string_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Scalars, references and empty collections: values that never need
    /// more than one line.
    pub fn is_scalar(&self) -> bool {
        match self {
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => true,
        }
    }

    /// Collect every reference contained in this value.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        match self {
            Value::Reference(r) => out.push(r),
            Value::List(items) => items.iter().for_each(|v| v.collect_references(out)),
            Value::Map(map) => map.values().for_each(|v| v.collect_references(out)),
            _ => {}
        }
    }

    /// Collect every variable name used by this value.
    pub fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Value::Variable(name) | Value::VariableKey(name, _) => out.push(name),
            Value::Template(t) => out.extend(t.variables()),
            Value::List(items) => items.iter().for_each(|v| v.collect_variables(out)),
            Value::Map(map) => map.values().for_each(|v| v.collect_variables(out)),
            _ => {}
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Reference(r)
    }
}

impl From<Template> for Value {
    fn from(t: Template) -> Self {
        Value::Template(t)
    }
}

/// An entry in a body: either `key = value` or a nested block.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Attribute { key: String, value: Value },
    Block(Block),
}

/// Ordered contents of a block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Body {
    items: Vec<BodyItem>,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_attr(key, value);
        self
    }

    /// Builder-style attribute, skipped when `value` is `None`.
    pub fn attr_opt<V: Into<Value>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.push_attr(key, value);
        }
        self
    }

    /// Builder-style nested block without labels.
    pub fn block(mut self, name: impl Into<String>, body: Body) -> Self {
        self.push_block(Block::new(name, body));
        self
    }

    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.push(BodyItem::Attribute {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn push_block(&mut self, block: Block) {
        self.items.push(BodyItem::Block(block));
    }

    pub fn items(&self) -> &[BodyItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First attribute with the given key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.iter().find_map(|item| match item {
            BodyItem::Attribute { key: k, value } if k == key => Some(value),
            _ => None,
        })
    }

    /// Nested blocks with the given name, in order.
    pub fn blocks<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.items.iter().filter_map(move |item| match item {
            BodyItem::Block(block) if block.keyword == name => Some(block),
            _ => None,
        })
    }

    /// Every reference in this body, recursively, in document order.
    pub fn references(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Reference>) {
        for item in &self.items {
            match item {
                BodyItem::Attribute { value, .. } => value.collect_references(out),
                BodyItem::Block(block) => block.body.collect_references(out),
            }
        }
    }

    /// Every variable name used in this body, recursively, in document order.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        for item in &self.items {
            match item {
                BodyItem::Attribute { value, .. } => value.collect_variables(out),
                BodyItem::Block(block) => block.body.collect_variables(out),
            }
        }
    }
}

/// A block: `keyword "label" ... { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub keyword: String,
    pub labels: Vec<String>,
    pub body: Body,
}

impl Block {
    /// Block without labels.
    pub fn new(keyword: impl Into<String>, body: Body) -> Self {
        Self {
            keyword: keyword.into(),
            labels: Vec::new(),
            body,
        }
    }

    /// Block with labels, e.g. `resource "kind" "name"`.
    pub fn labeled<I, S>(keyword: impl Into<String>, labels: I, body: Body) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyword: keyword.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_display() {
        let r = Reference::new("google_cloud_run_service", "shop-service-api")
            .attr("status")
            .index(0)
            .attr("url");
        assert_eq!(
            r.to_string(),
            "google_cloud_run_service.shop-service-api.status[0].url"
        );
        assert_eq!(r.address(), "google_cloud_run_service.shop-service-api");
    }

    #[test]
    fn test_body_collects_nested_references() {
        let subnet = Reference::new("google_compute_subnetwork", "shop-subnet-us-central1").attr("id");
        let body = Body::new()
            .attr("name", "web")
            .block(
                "network_interface",
                Body::new().attr("subnetwork", subnet.clone()),
            )
            .attr(
                "depends",
                Value::List(vec![Reference::new("google_compute_network", "shop-vpc").into()]),
            );

        let refs = body.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], &subnet);
        assert_eq!(refs[1].name, "shop-vpc");
    }

    #[test]
    fn test_body_collects_variables() {
        let body = Body::new()
            .attr("name", Template::new().var("application_name").lit("-vpc"))
            .attr("cidr", Value::VariableKey("secondary_subnet_cidrs".into(), "us-east1".into()))
            .block("inner", Body::new().attr("region", Value::var("primary_region")));

        assert_eq!(
            body.variables(),
            vec!["application_name", "secondary_subnet_cidrs", "primary_region"]
        );
    }

    #[test]
    fn test_body_lookup() {
        let body = Body::new()
            .attr("a", 1i64)
            .attr_opt("b", None::<bool>)
            .block("rule", Body::new())
            .block("rule", Body::new());
        assert_eq!(body.get("a"), Some(&Value::Number(1)));
        assert_eq!(body.get("b"), None);
        assert_eq!(body.blocks("rule").count(), 2);
    }
}
