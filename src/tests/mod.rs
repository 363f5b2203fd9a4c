use crate::AnnotationIndex;


/// Check every structural invariant plus the size law.
fn assert_invariants<V>(index: &AnnotationIndex<V>) {
    assert!(index.verify_balance(), "balance violated: {:?}", index);
    assert!(index.verify_augmentation(), "max_end stale: {:?}", index);
    assert!(index.verify_order(), "order or links broken: {:?}", index);
    assert_eq!(index.entries().count(), index.len());
}

/// Render entries one per line as `start..end value`.
fn render<V: std::fmt::Display>(index: &AnnotationIndex<V>) -> String {
    index
        .entries()
        .map(|e| format!("{}..{} {}", e.start(), e.end(), e.value()))
        .collect::<Vec<_>>()
        .join("\n")
}
