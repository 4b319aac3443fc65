//! Flattening engine: expands a root record into leaf [`OutputEntry`]s.
//!
//! Fields are visited in declaration order. Leaves emit `prefix + name`;
//! prefix containers recurse with `prefix + container prefix`. Types on the
//! active recursion path are never re-entered.

use std::{collections::HashSet, rc::Rc};

use crate::core::{
    annotation::AnnotationExtractor,
    data::{Diagnostic, Field, OutputEntry, RecordKey, RecordType, TypeRef},
    error::Result,
    graph::ReferenceGraph,
    resolve::{DependencyResolver, Resolution},
};

pub struct Flattener<'a> {
    graph: &'a ReferenceGraph,
    extractor: &'a AnnotationExtractor,
    resolver: &'a mut DependencyResolver,
    /// Records currently being expanded.
    active: HashSet<RecordKey>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Flattener<'a> {
    pub fn new(
        graph: &'a ReferenceGraph,
        extractor: &'a AnnotationExtractor,
        resolver: &'a mut DependencyResolver,
    ) -> Self {
        Self {
            graph,
            extractor,
            resolver,
            active: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Expand `record` with every variable name prefixed by `prefix`.
    pub fn flatten(&mut self, prefix: &str, record: &Rc<RecordType>) -> Result<Vec<OutputEntry>> {
        let mut output = Vec::new();
        self.active.insert(record.key());
        let result = self.flatten_fields(prefix, record, &mut output);
        self.active.remove(&record.key());
        result.map(|()| output)
    }

    /// Diagnostics collected so far.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn flatten_fields(
        &mut self,
        prefix: &str,
        record: &Rc<RecordType>,
        output: &mut Vec<OutputEntry>,
    ) -> Result<()> {
        for field in &record.fields {
            let Some(descriptor) = self.extractor.extract(&field.tag) else {
                if field.type_ref.is_primitive() {
                    self.diagnostics.push(Diagnostic::UntaggedLeaf {
                        record: record.key(),
                        field: field.name.clone(),
                    });
                }
                continue;
            };

            if field.type_ref.is_primitive() || !descriptor.is_prefix_container {
                output.push(OutputEntry {
                    package: record.package.clone(),
                    name: format!("{prefix}{}", descriptor.variable_name),
                    default_value: descriptor.default_value,
                });
                continue;
            }

            let Some(nested) = self.resolve_nested(record, field)? else {
                continue;
            };

            if self.active.contains(&nested.key()) {
                self.diagnostics.push(Diagnostic::CycleSkipped {
                    record: record.key(),
                    field: field.name.clone(),
                });
                continue;
            }

            let nested_prefix = format!("{prefix}{}", descriptor.prefix);
            output.extend(self.flatten(&nested_prefix, &nested)?);
        }

        Ok(())
    }

    /// Record type behind a prefix-container field, or `None` (with a diagnostic)
    /// when it cannot be found.
    fn resolve_nested(
        &mut self,
        record: &RecordType,
        field: &Field,
    ) -> Result<Option<Rc<RecordType>>> {
        match &field.type_ref {
            TypeRef::Local(type_name) => {
                if let Some(found) = self.graph.get(&record.package, type_name) {
                    return Ok(Some(Rc::clone(found)));
                }

                // Not in the graph: look through the declaring package's directory.
                let found = self
                    .resolver
                    .scan_package_dir(record.directory(), &record.package)?
                    .iter()
                    .find(|candidate| candidate.name == *type_name)
                    .cloned();

                if found.is_none() {
                    self.diagnostics.push(Diagnostic::NestedTypeNotFound {
                        record: record.key(),
                        field: field.name.clone(),
                        type_name: type_name.clone(),
                    });
                }
                Ok(found)
            }
            TypeRef::Qualified { alias, name } => {
                match self
                    .resolver
                    .resolve(alias, name, &record.imports, self.graph)?
                {
                    Resolution::Found(found) => Ok(Some(found)),
                    Resolution::ImportNotMatched => {
                        self.diagnostics.push(Diagnostic::ImportNotMatched {
                            record: record.key(),
                            field: field.name.clone(),
                            alias: alias.clone(),
                        });
                        Ok(None)
                    }
                    Resolution::NotFound { import_path } => {
                        self.diagnostics.push(Diagnostic::DependencyNotFound {
                            record: record.key(),
                            field: field.name.clone(),
                            import_path,
                            type_name: name.clone(),
                        });
                        Ok(None)
                    }
                }
            }
            TypeRef::Primitive(_) | TypeRef::Composite(_) => Ok(None),
        }
    }
}
