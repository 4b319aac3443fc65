//! Data model shared by every phase of the analysis.
//!
//! - **Scan**: [`SourceUnit`], [`RecordType`], [`Field`], [`Import`]
//! - **Graph**: [`RecordKey`]
//! - **Flatten**: [`OutputEntry`], [`Diagnostic`]

use std::{
    fmt,
    path::{Path, PathBuf},
    rc::Rc,
};

/// One scanned Go file.
///
/// Created once per scan and never mutated afterwards. Project files are
/// owned by the graph builder, dependency files by the resolver cache.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub file_path: PathBuf,
    /// Package identity: `module/dir` for project packages, the module path for
    /// `main` packages, the import path for dependencies.
    pub package: String,
    pub imports: Rc<[Import]>,
    pub records: Vec<Rc<RecordType>>,
}

/// A single `import` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    /// Explicit local name (`import cfg "example.com/config"`), if any.
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn with_alias(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }

    /// Last path segment, which is the conventional package name.
    pub fn last_segment(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// An exported struct with at least one exported, tagged field.
#[derive(Debug, Clone)]
pub struct RecordType {
    pub file_path: PathBuf,
    pub package: String,
    pub name: String,
    pub fields: Vec<Field>,
    /// Imports of the declaring file, needed to resolve qualified field types.
    pub imports: Rc<[Import]>,
}

impl RecordType {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.package, &self.name)
    }

    /// Directory of the declaring file.
    pub fn directory(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Type text exactly as written in source.
    pub type_text: String,
    pub type_ref: TypeRef,
    /// Tag content with the literal delimiters removed.
    pub tag: String,
}

impl Field {
    pub fn new(name: impl Into<String>, type_text: impl Into<String>, tag: impl Into<String>) -> Self {
        let type_text = type_text.into();
        Self {
            name: name.into(),
            type_ref: TypeRef::parse(&type_text),
            type_text,
            tag: tag.into(),
        }
    }
}

/// Key into the reference graph: `(package identity, type name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub package: String,
    pub name: String,
}

impl RecordKey {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Builtin types that always end up as leaf entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Byte,
    Rune,
    Time,
    Duration,
}

impl PrimitiveKind {
    pub fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "string" => Self::String,
            "bool" => Self::Bool,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "uintptr" => Self::Uintptr,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "byte" => Self::Byte,
            "rune" => Self::Rune,
            "time.Time" => Self::Time,
            "time.Duration" => Self::Duration,
            _ => return None,
        };
        Some(kind)
    }
}

/// Classified field type, computed once when the field is scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// Unqualified name of a type in the same package.
    Local(String),
    /// `alias.Name`, a type from another package.
    Qualified { alias: String, name: String },
    /// Slices, maps, generics, channels, func types and anything else that is
    /// never resolved to a record.
    Composite(String),
}

impl TypeRef {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(kind) = PrimitiveKind::from_type_name(text) {
            return Self::Primitive(kind);
        }

        // A pointer to a record flattens like the record itself.
        let target = text.strip_prefix('*').map(str::trim_start).unwrap_or(text);
        if target != text && PrimitiveKind::from_type_name(target).is_some() {
            return Self::Composite(text.to_string());
        }

        match target.split_once('.') {
            None if is_identifier(target) => Self::Local(target.to_string()),
            Some((alias, name)) if is_identifier(alias) && is_identifier(name) => Self::Qualified {
                alias: alias.to_string(),
                name: name.to_string(),
            },
            _ => Self::Composite(text.to_string()),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Go's notion of an exported identifier.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// One flattened environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    /// Package of the record that declared the leaf field.
    pub package: String,
    pub name: String,
    pub default_value: String,
}

impl fmt::Display for OutputEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.default_value)
    }
}

/// Non-fatal finding recorded while flattening. Each one means some subtree of
/// entries was omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A record reached itself through its own prefix containers.
    CycleSkipped { record: RecordKey, field: String },
    /// An unqualified nested type was found neither in the graph nor in the
    /// declaring directory.
    NestedTypeNotFound { record: RecordKey, field: String, type_name: String },
    /// No import matches the alias of a qualified field type.
    ImportNotMatched { record: RecordKey, field: String, alias: String },
    /// The import matched but the dependency (or the type in it) could not be found.
    DependencyNotFound { record: RecordKey, field: String, import_path: String, type_name: String },
    /// A primitive field without the recognised tag key inside a nested record.
    UntaggedLeaf { record: RecordKey, field: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleSkipped { record, field } => {
                write!(f, "{record}.{field}: cyclic reference, skipped")
            }
            Self::NestedTypeNotFound {
                record,
                field,
                type_name,
            } => write!(f, "{record}.{field}: type {type_name} not found, skipped"),
            Self::ImportNotMatched {
                record,
                field,
                alias,
            } => write!(f, "{record}.{field}: no import matches `{alias}`, skipped"),
            Self::DependencyNotFound {
                record,
                field,
                import_path,
                type_name,
            } => write!(
                f,
                "{record}.{field}: {type_name} not found in {import_path}, skipped"
            ),
            Self::UntaggedLeaf { record, field } => {
                write!(f, "{record}.{field}: no env tag, skipped")
            }
        }
    }
}
