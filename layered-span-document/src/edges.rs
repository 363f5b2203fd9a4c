//! Labeled edges between annotations, indexed in both directions.
//!
//! Edges are stored from a **source** annotation to a **target** annotation:
//!
//! ```text
//! [obligation] --obligor--> [defined term]
//!    ↑ source                  ↑ target
//! ```
//!
//! Forward lookups (`outgoing`) and reverse lookups (`incoming`) are both
//! O(k) in the number of edges touching the annotation.

use std::collections::HashMap;

use crate::AnnotationRef;

/// One end of an edge as seen from the other end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// The label of the edge (e.g. "obligor")
    pub label: String,
    /// The other end (target for outgoing, source for incoming)
    pub other: AnnotationRef,
}

/// Bidirectional edge index.
#[derive(Debug, Default)]
pub struct EdgeIndex {
    /// source -> [(label, target)]
    outgoing: HashMap<AnnotationRef, Vec<Edge>>,
    /// target -> [(label, source)]
    incoming: HashMap<AnnotationRef, Vec<Edge>>,
    len: usize,
}

impl EdgeIndex {
    pub(crate) fn insert(&mut self, label: &str, source: AnnotationRef, target: AnnotationRef) {
        self.outgoing.entry(source.clone()).or_default().push(Edge {
            label: label.to_string(),
            other: target.clone(),
        });
        self.incoming.entry(target).or_default().push(Edge {
            label: label.to_string(),
            other: source,
        });
        self.len += 1;
    }

    /// Drop every edge touching `annotation`. Returns the number removed.
    pub(crate) fn detach(&mut self, annotation: &AnnotationRef) -> usize {
        let mut removed = 0;

        for edge in self.outgoing.remove(annotation).unwrap_or_default() {
            removed += 1;
            if let Some(sources) = self.incoming.get_mut(&edge.other) {
                sources.retain(|e| !(e.other == *annotation && e.label == edge.label));
            }
        }
        for edge in self.incoming.remove(annotation).unwrap_or_default() {
            removed += 1;
            if let Some(targets) = self.outgoing.get_mut(&edge.other) {
                targets.retain(|e| !(e.other == *annotation && e.label == edge.label));
            }
        }

        self.outgoing.retain(|_, edges| !edges.is_empty());
        self.incoming.retain(|_, edges| !edges.is_empty());
        self.len -= removed;
        removed
    }

    /// Edges leaving `annotation`.
    ///
    /// Returns an empty slice if there are none.
    pub fn outgoing(&self, annotation: &AnnotationRef) -> &[Edge] {
        self.outgoing.get(annotation).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Edges arriving at `annotation`.
    pub fn incoming(&self, annotation: &AnnotationRef) -> &[Edge] {
        self.incoming.get(annotation).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Targets of outgoing edges with the given label.
    pub fn outgoing_by_label<'a>(
        &'a self,
        annotation: &AnnotationRef,
        label: &'a str,
    ) -> impl Iterator<Item = &'a AnnotationRef> + 'a {
        self.outgoing(annotation)
            .iter()
            .filter(move |edge| edge.label == label)
            .map(|edge| &edge.other)
    }

    /// Sources of incoming edges with the given label.
    pub fn incoming_by_label<'a>(
        &'a self,
        annotation: &AnnotationRef,
        label: &'a str,
    ) -> impl Iterator<Item = &'a AnnotationRef> + 'a {
        self.incoming(annotation)
            .iter()
            .filter(move |edge| edge.label == label)
            .map(|edge| &edge.other)
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LayerKey;
    use layered_span_index::AnnotationIndex;

    fn refs(n: usize) -> Vec<AnnotationRef> {
        let mut index = AnnotationIndex::new();
        (0..n)
            .map(|i| AnnotationRef::new(LayerKey::base("test"), index.add(i, i + 1, ()).unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_index() {
        let edges = EdgeIndex::default();
        let r = &refs(1)[0];
        assert!(edges.is_empty());
        assert!(edges.outgoing(r).is_empty());
        assert!(edges.incoming(r).is_empty());
    }

    #[test]
    fn test_insert_both_directions() {
        let r = refs(2);
        let mut edges = EdgeIndex::default();
        edges.insert("obligor", r[1].clone(), r[0].clone());

        assert_eq!(edges.outgoing(&r[1]).len(), 1);
        assert_eq!(edges.outgoing(&r[1])[0].other, r[0]);
        assert_eq!(edges.incoming(&r[0])[0].other, r[1]);
        assert_eq!(edges.incoming(&r[0])[0].label, "obligor");
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_filter_by_label() {
        let r = refs(3);
        let mut edges = EdgeIndex::default();
        edges.insert("obligor", r[1].clone(), r[0].clone());
        edges.insert("beneficiary", r[2].clone(), r[0].clone());
        edges.insert("obligor", r[2].clone(), r[0].clone());

        let obligors: Vec<_> = edges.incoming_by_label(&r[0], "obligor").collect();
        assert_eq!(obligors, vec![&r[1], &r[2]]);
        assert_eq!(edges.outgoing_by_label(&r[2], "beneficiary").count(), 1);
        assert_eq!(edges.incoming_by_label(&r[0], "missing").count(), 0);
    }

    #[test]
    fn test_detach_removes_both_directions() {
        let r = refs(3);
        let mut edges = EdgeIndex::default();
        edges.insert("a", r[0].clone(), r[1].clone());
        edges.insert("b", r[1].clone(), r[2].clone());
        edges.insert("c", r[2].clone(), r[0].clone());

        assert_eq!(edges.detach(&r[1]), 2);
        assert_eq!(edges.len(), 1);
        assert!(edges.outgoing(&r[0]).is_empty());
        assert!(edges.incoming(&r[2]).is_empty());
        assert_eq!(edges.outgoing(&r[2])[0].other, r[0]);
    }

    #[test]
    fn test_detach_self_loop() {
        let r = refs(1);
        let mut edges = EdgeIndex::default();
        edges.insert("self", r[0].clone(), r[0].clone());

        assert_eq!(edges.detach(&r[0]), 1);
        assert!(edges.is_empty());
    }
}
