//! Graph derivation: ordered passes over the completed symbol tables.
//!
//! Later passes read only the symbol tables, never edges from earlier
//! passes, so pass order affects edge list order and nothing else.

use tracing::debug;

use super::GoAnalyzer;
use crate::model::{Edge, Entity, FuncId, Graph, LinkKind, Node, TypeId};
use crate::parser::{CallSite, TypeKind};

/// Go primitive type names, never the target of `embeds`/`uses` links.
const PRIMITIVES: &[&str] = &[
    "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "byte", "rune", "float32", "float64", "complex64", "complex128",
    "error",
];

/// Derive the output graph from the analyzer's symbol tables.
pub(crate) fn build(a: &GoAnalyzer) -> Graph {
    let mut graph = Graph::default();

    emit_nodes(a, &mut graph);
    import_edges(a, &mut graph);
    contains_edges(a, &mut graph);
    call_edges(a, &mut graph);
    type_dependency_edges(a, &mut graph);

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "graph passes complete"
    );
    graph
}

/// Pass 1: one node per package, type, function, and method.
fn emit_nodes(a: &GoAnalyzer, graph: &mut Graph) {
    for (path, pkg) in a.packages() {
        graph.nodes.push(Node {
            id: path.clone(),
            title: pkg.name.clone(),
            entity: Entity::Package,
        });
    }

    for (id, ty) in a.types() {
        graph.nodes.push(Node {
            id: id.to_string(),
            title: ty.name.clone(),
            entity: match ty.kind {
                TypeKind::Record => Entity::Struct,
                TypeKind::Interface => Entity::Interface,
            },
        });
    }

    for (id, func) in a.functions() {
        graph.nodes.push(Node {
            id: id.to_string(),
            title: func.name.clone(),
            entity: Entity::Function,
        });
    }

    for (id, method) in a.methods() {
        graph.nodes.push(Node {
            id: id.to_string(),
            title: method.name.clone(),
            entity: Entity::Method,
        });
    }
}

/// Pass 2: package → import path, for imports inside the module root.
///
/// No existence check on the target: an import may name a package that was
/// never walked, leaving a dangling link by design.
fn import_edges(a: &GoAnalyzer, graph: &mut Graph) {
    for (path, pkg) in a.packages() {
        for import in &pkg.imports {
            if import.starts_with(a.module_path()) {
                graph.edges.push(Edge {
                    from: path.clone(),
                    to: import.clone(),
                    kind: LinkKind::Import,
                    method: None,
                });
            }
        }
    }
}

/// Pass 3: package → type, package → function, and type → method.
///
/// A method whose receiver type was never declared in the analyzed set
/// gets no containment link and stays parent-less.
fn contains_edges(a: &GoAnalyzer, graph: &mut Graph) {
    for id in a.types().keys() {
        graph.edges.push(Edge {
            from: id.package.clone(),
            to: id.to_string(),
            kind: LinkKind::Contains,
            method: None,
        });
    }

    for id in a.functions().keys() {
        graph.edges.push(Edge {
            from: id.package.clone(),
            to: id.to_string(),
            kind: LinkKind::Contains,
            method: None,
        });
    }

    for id in a.methods().keys() {
        let receiver_type = id.receiver_type();
        if a.types().contains_key(&receiver_type) {
            graph.edges.push(Edge {
                from: receiver_type.to_string(),
                to: id.to_string(),
                kind: LinkKind::Contains,
                method: None,
            });
        }
    }
}

/// Pass 4: resolved call sites.
///
/// Only bare-identifier calls resolve, and only against free functions of
/// the caller's own package. Selector calls, calls to methods, and
/// cross-package calls never produce a link: precision over recall, with
/// cross-package coupling summarized by the import links instead.
fn call_edges(a: &GoAnalyzer, graph: &mut Graph) {
    for (id, func) in a.functions() {
        for call in &func.calls {
            push_call_edge(a, graph, &id.to_string(), &id.package, call);
        }
    }

    for (id, method) in a.methods() {
        for call in &method.calls {
            push_call_edge(a, graph, &id.to_string(), &id.package, call);
        }
    }
}

fn push_call_edge(a: &GoAnalyzer, graph: &mut Graph, from: &str, package: &str, call: &CallSite) {
    if let Some(target) = resolve_call_target(a, package, call) {
        graph.edges.push(Edge {
            from: from.to_string(),
            to: target.to_string(),
            kind: LinkKind::Calls,
            method: Some(call.target.clone()),
        });
    }
}

fn resolve_call_target(a: &GoAnalyzer, package: &str, call: &CallSite) -> Option<FuncId> {
    if call.is_method() {
        return None;
    }
    let id = FuncId::new(package, call.target.clone());
    a.functions().contains_key(&id).then_some(id)
}

/// Pass 5: `embeds` and `uses` links between declared types.
///
/// Both are intra-package only and skip primitives; a cross-package field
/// type is never linked, mirroring the call-edge policy.
fn type_dependency_edges(a: &GoAnalyzer, graph: &mut Graph) {
    for (id, ty) in a.types() {
        for embed in &ty.embeds {
            if PRIMITIVES.contains(&embed.as_str()) {
                continue;
            }
            let embed_id = TypeId::new(id.package.clone(), embed.clone());
            if a.types().contains_key(&embed_id) {
                graph.edges.push(Edge {
                    from: id.to_string(),
                    to: embed_id.to_string(),
                    kind: LinkKind::Embeds,
                    method: None,
                });
            }
        }

        for field in &ty.fields {
            if PRIMITIVES.contains(&field.type_name.as_str()) {
                continue;
            }
            if field.type_package != id.package {
                continue;
            }
            let dep_id = TypeId::new(id.package.clone(), field.type_name.clone());
            if a.types().contains_key(&dep_id) {
                graph.edges.push(Edge {
                    from: id.to_string(),
                    to: dep_id.to_string(),
                    kind: LinkKind::Uses,
                    method: None,
                });
            }
        }
    }
}
