//! Structured PHP class tree
//!
//! Generators build a [`PhpFile`] holding one namespace and one class; the
//! [`Printer`](super::Printer) turns it into source text. Class references
//! go through [`PhpNamespace::add_use`], which records the import and returns
//! the name to use in code.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::naming::short_name;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// A type declaration (`int`, `?string`, `UsersData|false|null`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpType {
    pub name: String,
    pub nullable: bool,
}

impl PhpType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
        }
    }

    pub fn nullable(name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            nullable,
        }
    }
}

impl fmt::Display for PhpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let implicit_null = matches!(self.name.as_str(), "mixed" | "null")
            || self.name.split('|').any(|part| part == "null");

        if !self.nullable || implicit_null {
            f.write_str(&self.name)
        } else if self.name.contains('|') {
            write!(f, "{}|null", self.name)
        } else {
            write!(f, "?{}", self.name)
        }
    }
}

/// A constant expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Verbatim code
    Raw(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{:.1}", x),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Str(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Raw(code) => f.write_str(code),
        }
    }
}

/// A function parameter, optionally promoted to a property
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Option<PhpType>,
    pub default: Option<Literal>,
    pub promoted: Option<Visibility>,
}

impl Parameter {
    pub fn new(name: &str, ty: PhpType) -> Self {
        Self {
            name: name.to_string(),
            ty: Some(ty),
            default: None,
            promoted: None,
        }
    }

    pub fn default_value(mut self, value: Literal) -> Self {
        self.default = Some(value);
        self
    }

    pub fn promoted(mut self, visibility: Visibility) -> Self {
        self.promoted = Some(visibility);
        self
    }
}

/// A declared class property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub visibility: Visibility,
    pub ty: Option<PhpType>,
    pub value: Option<Literal>,
}

impl PropertyDecl {
    pub fn new(name: &str, visibility: Visibility) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            ty: None,
            value: None,
        }
    }

    pub fn typed(mut self, ty: PhpType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn value(mut self, value: Literal) -> Self {
        self.value = Some(value);
        self
    }
}

/// A class method
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub params: Vec<Parameter>,
    pub return_type: Option<PhpType>,
    pub comment: Vec<String>,
    /// Body lines, relative to the method indentation
    pub body: Vec<String>,
}

impl Method {
    /// A public instance method
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visibility: Visibility::Public,
            is_static: false,
            params: Vec::new(),
            return_type: None,
            comment: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: PhpType) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn comment(mut self, line: &str) -> Self {
        self.comment.push(line.to_string());
        self
    }

    /// Append body code; multi-line text is split into lines
    pub fn body(mut self, code: &str) -> Self {
        self.body.extend(code.lines().map(str::to_string));
        self
    }

    pub fn add_line(&mut self, line: impl Into<String>) {
        self.body.push(line.into());
    }
}

/// A class declaration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassType {
    pub name: String,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<Method>,
}

impl ClassType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_property(&mut self, property: PropertyDecl) {
        self.properties.push(property);
    }

    pub fn add_method(&mut self, method: Method) {
        self.methods.push(method);
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A namespace with its imports
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhpNamespace {
    name: String,
    /// fqcn -> alias, ordered by fqcn
    uses: BTreeMap<String, String>,
    taken: HashSet<String>,
}

impl PhpNamespace {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim_matches('\\').to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reserve a short name declared in this namespace
    pub fn reserve(&mut self, short: &str) {
        self.taken.insert(short.to_ascii_lowercase());
    }

    /// Import a class and return how code in this namespace refers to it.
    ///
    /// Global classes and classes of this namespace need no import. A short
    /// name already taken by another class falls back to `\Fully\Qualified`.
    pub fn add_use(&mut self, fqcn: &str) -> String {
        let fqcn = fqcn.trim_start_matches('\\');
        let short = short_name(fqcn).to_string();

        if !fqcn.contains('\\') {
            return format!("\\{}", fqcn);
        }

        if let Some(alias) = self.uses.get(fqcn) {
            return alias.clone();
        }

        let namespace = &fqcn[..fqcn.len() - short.len() - 1];
        let key = short.to_ascii_lowercase();

        if namespace == self.name {
            if self.uses.values().any(|a| a.eq_ignore_ascii_case(&short)) {
                return format!("\\{}", fqcn);
            }
            self.taken.insert(key);
            return short;
        }

        if self.taken.contains(&key) {
            return format!("\\{}", fqcn);
        }

        self.taken.insert(key);
        self.uses.insert(fqcn.to_string(), short.clone());
        short
    }

    /// Imported names, sorted
    pub fn uses(&self) -> impl Iterator<Item = &str> {
        self.uses.keys().map(String::as_str)
    }
}

/// A source file with one namespace and one class
#[derive(Debug, Clone, PartialEq)]
pub struct PhpFile {
    pub strict_types: bool,
    pub namespace: PhpNamespace,
    pub class: ClassType,
}

impl PhpFile {
    /// Create a file declaring `class_name` in `namespace`
    pub fn new(namespace: &str, class_name: &str) -> Self {
        let mut namespace = PhpNamespace::new(namespace);
        namespace.reserve(class_name);
        Self {
            strict_types: true,
            namespace,
            class: ClassType::new(class_name),
        }
    }

    /// Fully-qualified name of the declared class
    pub fn class_fqcn(&self) -> String {
        if self.namespace.name().is_empty() {
            self.class.name.clone()
        } else {
            format!("{}\\{}", self.namespace.name(), self.class.name)
        }
    }
}
