use pathway_model::{GeneratedAt, PathwayNode, ReportSnapshot};
use pathway_report::{lint, ReportConfig, ReportParser, ReportRenderer};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,8}( [A-Za-z0-9]{1,6}){0,2}"
}

fn node() -> impl Strategy<Value = PathwayNode> {
    let leaf = (name(), proptest::option::of(0..10_000u64)).prop_map(|(name, count)| PathwayNode {
        name,
        interaction_count: count,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (name(), proptest::option::of(0..10_000u64), proptest::collection::vec(inner, 0..4)).prop_map(
            |(name, count, children)| PathwayNode {
                name,
                interaction_count: count,
                children,
            },
        )
    })
}

fn snapshot() -> impl Strategy<Value = ReportSnapshot> {
    (
        proptest::collection::vec(node(), 0..4),
        0..24u32,
        0..60u32,
        proptest::option::of(-12..=12i32),
    )
        .prop_map(|(roots, hour, minute, offset)| {
            let stamp = match offset {
                Some(h) if h < 0 => format!("2025-01-12T{hour:02}:{minute:02}:00-{:02}:00", -h),
                Some(h) => format!("2025-01-12T{hour:02}:{minute:02}:00+{h:02}:00"),
                None => format!("2025-01-12T{hour:02}:{minute:02}:00.5"),
            };
            let at: GeneratedAt = stamp.parse().unwrap();
            ReportSnapshot::new(at, roots)
        })
}

proptest! {
    #[test]
    fn prop_parse_inverts_render(snapshot in snapshot(), width in 1..5usize) {
        let renderer = ReportRenderer::new().with_indent_width(width);
        let parser = ReportParser::new().with_indent_width(width);
        let text = renderer.render(&snapshot).unwrap();
        prop_assert_eq!(parser.parse(&text).unwrap(), snapshot);
    }

    #[test]
    fn prop_render_is_stable(snapshot in snapshot()) {
        let text = ReportRenderer::new().render(&snapshot).unwrap();
        let reparsed = ReportParser::new().parse(&text).unwrap();
        prop_assert_eq!(ReportRenderer::new().render(&reparsed).unwrap(), text);
    }

    #[test]
    fn prop_computed_total_never_mismatches(snapshot in snapshot()) {
        let report = lint(&snapshot, &ReportConfig::new().with_strict_total(true));
        prop_assert!(!report.has_errors());
    }

    #[test]
    fn prop_misaligned_indent_rejected(extra in 1..4usize) {
        let text = format!(
            "# Pathway Hierarchy Tree\n# Generated: 2025-01-12T00:00:00\n# Total pathways: 2\n\n- A\n{}- B\n",
            " ".repeat(4 + extra)
        );
        let parser = ReportParser::new().with_indent_width(4);
        prop_assert!(parser.parse(&text).is_err());
    }

    #[test]
    fn prop_rendered_names_read_back(raw in "\\PC{0,24}", count in proptest::option::of(0..100u64)) {
        let mut node = PathwayNode::leaf(raw);
        node.interaction_count = count;
        let at: GeneratedAt = "2025-01-12T10:23:45".parse().unwrap();
        let snapshot = ReportSnapshot::new(at, vec![node]);
        // Either the entry is refused or it reads back unchanged
        if let Ok(text) = ReportRenderer::new().render(&snapshot) {
            prop_assert_eq!(ReportParser::new().parse(&text).unwrap(), snapshot);
        }
    }
}
