//! Symbol records: the input stream of the generator.
//!
//! A symbol backend enumerates the native types it knows about and describes
//! each one as a `SymbolRecord`. Records reference each other only by
//! `SymbolId`, in no particular order; a record may reference an id that
//! appears later in the stream, or never.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the symbol backend assigns to a native type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u64);

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shape of a native type as reported by the backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Primitive,
    Pointer,
    Array,
    Enum,
    UserType,
    TemplateInstantiation,
}

impl SymbolKind {
    /// Kinds that become standalone declarations.
    pub fn is_aggregate(self) -> bool {
        matches!(self, Self::UserType | Self::TemplateInstantiation)
    }
}

/// A data member of a user type.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub name: String,
    pub type_id: SymbolId,
    pub offset: u64,
}

/// A named constant of an enum.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EnumeratorRecord {
    pub name: String,
    pub value: i64,
}

/// One native type.
///
/// Which fields are meaningful depends on `kind`:
/// - `element` is the pointee of a pointer, the element of an array, or the
///   underlying integer type of an enum. `None` means `void`/unknown.
/// - `bases` and `fields` describe user types and template instantiations.
/// - `template_arguments` lists the arguments of a template instantiation,
///   whose `name` is the full instantiated name (`ns::Stack<int>`).
/// - `enumerators` lists enum constants.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRecord {
    pub id: SymbolId,
    pub kind: SymbolKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "elementId", alias = "pointeeId")]
    pub element: Option<SymbolId>,
    #[serde(default, rename = "baseTypeIds")]
    pub bases: Vec<SymbolId>,
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default, rename = "templateArgumentIds")]
    pub template_arguments: Vec<SymbolId>,
    #[serde(default)]
    pub enumerators: Vec<EnumeratorRecord>,
}

impl SymbolRecord {
    fn new(id: u64, kind: SymbolKind, name: &str, size: u64) -> Self {
        Self {
            id: SymbolId(id),
            kind,
            name: name.to_owned(),
            size,
            element: None,
            bases: Vec::new(),
            fields: Vec::new(),
            template_arguments: Vec::new(),
            enumerators: Vec::new(),
        }
    }

    pub fn primitive(id: u64, name: &str, size: u64) -> Self {
        Self::new(id, SymbolKind::Primitive, name, size)
    }

    /// Pointer record; `None` for `void*`.
    pub fn pointer(id: u64, pointee: Option<u64>, size: u64) -> Self {
        let mut record = Self::new(id, SymbolKind::Pointer, "", size);
        record.element = pointee.map(SymbolId);
        record
    }

    pub fn array(id: u64, element: Option<u64>, size: u64) -> Self {
        let mut record = Self::new(id, SymbolKind::Array, "", size);
        record.element = element.map(SymbolId);
        record
    }

    pub fn enumeration(id: u64, name: &str, size: u64, underlying: Option<u64>) -> Self {
        let mut record = Self::new(id, SymbolKind::Enum, name, size);
        record.element = underlying.map(SymbolId);
        record
    }

    pub fn user_type(id: u64, name: &str, size: u64) -> Self {
        Self::new(id, SymbolKind::UserType, name, size)
    }

    pub fn template_instantiation(id: u64, name: &str, size: u64, arguments: &[u64]) -> Self {
        let mut record = Self::new(id, SymbolKind::TemplateInstantiation, name, size);
        record.template_arguments = arguments.iter().copied().map(SymbolId).collect();
        record
    }

    pub fn with_field(mut self, name: &str, type_id: u64, offset: u64) -> Self {
        self.fields.push(FieldRecord {
            name: name.to_owned(),
            type_id: SymbolId(type_id),
            offset,
        });
        self
    }

    pub fn with_base(mut self, base: u64) -> Self {
        self.bases.push(SymbolId(base));
        self
    }

    pub fn with_enumerator(mut self, name: &str, value: i64) -> Self {
        self.enumerators.push(EnumeratorRecord {
            name: name.to_owned(),
            value,
        });
        self
    }

    /// Every id this record refers to, in declaration order.
    pub fn references(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.element
            .iter()
            .copied()
            .chain(self.bases.iter().copied())
            .chain(self.fields.iter().map(|f| f.type_id))
            .chain(self.template_arguments.iter().copied())
    }
}

/// Errors from loading or storing a record stream.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid symbol record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid record snapshot: {0}")]
    Snapshot(#[from] postcard::Error),

    #[error("not a record snapshot (bad magic)")]
    BadMagic,

    #[error("unsupported record snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u8, expected: u8 },
}

/// Parse a JSON array of symbol records.
pub fn parse_symbol_records(json: &str) -> Result<Vec<SymbolRecord>, RecordError> {
    Ok(serde_json::from_str(json)?)
}

const SNAPSHOT_MAGIC: &[u8; 4] = b"SYMG";
const SNAPSHOT_VERSION: u8 = 1;
const SNAPSHOT_HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 1;

/// Store a record stream as a binary snapshot: magic, version byte, postcard payload.
pub fn encode_records(records: &[SymbolRecord]) -> Result<Vec<u8>, RecordError> {
    let mut out = Vec::with_capacity(SNAPSHOT_HEADER_LEN);
    out.extend_from_slice(SNAPSHOT_MAGIC);
    out.push(SNAPSHOT_VERSION);
    postcard::to_extend(records, out).map_err(RecordError::from)
}

/// Load a snapshot produced by [`encode_records`].
pub fn decode_records(bytes: &[u8]) -> Result<Vec<SymbolRecord>, RecordError> {
    if bytes.len() < SNAPSHOT_HEADER_LEN || &bytes[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(RecordError::BadMagic);
    }
    let version = bytes[SNAPSHOT_MAGIC.len()];
    if version != SNAPSHOT_VERSION {
        return Err(RecordError::UnsupportedVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    Ok(postcard::from_bytes(&bytes[SNAPSHOT_HEADER_LEN..])?)
}
