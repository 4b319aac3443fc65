//! Reference graph over the project's record types.
//!
//! Every record is indexed by `(package, name)`. A record's reference counter
//! counts fields of other same-package records typed with it; records nobody references are
//! roots, provided every one of their fields carries the recognised tag key.

use std::{collections::HashMap, rc::Rc};

use crate::core::{
    annotation::AnnotationExtractor,
    data::{RecordKey, RecordType, SourceUnit, TypeRef},
};

#[derive(Debug)]
pub struct GraphNode {
    pub record: Rc<RecordType>,
    pub ref_count: usize,
}

/// Read-only after [`ReferenceGraph::build`].
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    /// Discovery order, which is also root order.
    nodes: Vec<GraphNode>,
    index: HashMap<RecordKey, usize>,
}

impl ReferenceGraph {
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut graph = Self::default();

        for record in units.iter().flat_map(|unit| &unit.records) {
            graph.insert(Rc::clone(record));
        }

        let mut referenced: Vec<usize> = Vec::new();
        for (own, node) in graph.nodes.iter().enumerate() {
            for field in &node.record.fields {
                let TypeRef::Local(type_name) = &field.type_ref else {
                    continue;
                };
                if let Some(&idx) = graph
                    .index
                    .get(&RecordKey::new(&node.record.package, type_name))
                    .filter(|&&idx| idx != own)
                {
                    referenced.push(idx);
                }
            }
        }
        for idx in referenced {
            graph.nodes[idx].ref_count += 1;
        }

        graph
    }

    /// First declaration wins.
    fn insert(&mut self, record: Rc<RecordType>) {
        let key = record.key();
        if self.index.contains_key(&key) {
            return;
        }
        self.index.insert(key, self.nodes.len());
        self.nodes.push(GraphNode {
            record,
            ref_count: 0,
        });
    }

    pub fn get(&self, package: &str, name: &str) -> Option<&Rc<RecordType>> {
        self.index
            .get(&RecordKey::new(package, name))
            .map(|&idx| &self.nodes[idx].record)
    }

    pub fn node(&self, package: &str, name: &str) -> Option<&GraphNode> {
        self.index
            .get(&RecordKey::new(package, name))
            .map(|&idx| &self.nodes[idx])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Unreferenced records whose every field carries the tag key, in
    /// discovery order.
    ///
    /// Records failing the tag check are still reachable as nested types.
    pub fn roots(&self, extractor: &AnnotationExtractor) -> Vec<Rc<RecordType>> {
        self.nodes
            .iter()
            .filter(|node| node.ref_count == 0)
            .filter(|node| is_fully_annotated(&node.record, extractor))
            .map(|node| Rc::clone(&node.record))
            .collect()
    }
}

fn is_fully_annotated(record: &RecordType, extractor: &AnnotationExtractor) -> bool {
    record
        .fields
        .iter()
        .all(|field| extractor.extract(&field.tag).is_some())
}
