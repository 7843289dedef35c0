//! The architecture graph document and symbol identities.
//!
//! `Graph` is the serializable output: two ordered collections named
//! `components` and `links`. The collection and field names are part of
//! the compatibility contract for downstream consumers (visualization,
//! linting, documentation tooling).

use serde::{Deserialize, Serialize};
use std::fmt;

/// An architecture graph: components (nodes) and links (edges).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(rename = "components")]
    pub nodes: Vec<Node>,
    #[serde(rename = "links")]
    pub edges: Vec<Edge>,
}

/// A component in the architecture graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub title: String,
    pub entity: Entity,
}

/// The kind of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Package,
    /// A record type with named fields.
    Struct,
    /// A type defined purely by a method contract.
    Interface,
    Function,
    Method,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Package => write!(f, "package"),
            Entity::Struct => write!(f, "struct"),
            Entity::Interface => write!(f, "interface"),
            Entity::Function => write!(f, "function"),
            Entity::Method => write!(f, "method"),
        }
    }
}

/// A link between components.
///
/// `to` is not guaranteed to reference an emitted node: an `import` link
/// targets a package path string that may lie outside the analyzed tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    /// The textual call target, populated only on `calls` links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

/// The kind of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Import,
    Contains,
    Calls,
    Uses,
    Embeds,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Import => write!(f, "import"),
            LinkKind::Contains => write!(f, "contains"),
            LinkKind::Calls => write!(f, "calls"),
            LinkKind::Uses => write!(f, "uses"),
            LinkKind::Embeds => write!(f, "embeds"),
        }
    }
}

// ─── Symbol Identities ──────────────────────────────────────────────────
//
// Typed composite keys for the symbol tables. Keeping the package, the
// receiver, and the short name as separate components rules out accidental
// collisions between symbols of different kinds that share a dotted
// rendering; `Display` produces the dotted string used as the node id.

/// Identity of a type declaration: `package.Name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId {
    pub package: String,
    pub name: String,
}

impl TypeId {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Identity of a free function: `package.Name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FuncId {
    pub package: String,
    pub name: String,
}

impl FuncId {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Identity of a method: `package.ReceiverType.Name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId {
    pub package: String,
    pub receiver: String,
    pub name: String,
}

impl MethodId {
    pub fn new(
        package: impl Into<String>,
        receiver: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            receiver: receiver.into(),
            name: name.into(),
        }
    }

    /// Identity of the receiver type this method belongs to.
    pub fn receiver_type(&self) -> TypeId {
        TypeId::new(self.package.clone(), self.receiver.clone())
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.package, self.receiver, self.name)
    }
}
