use crate::tree::annotated_spans;
use crate::{align, count_attributed_spans, reconcile, RawSegment, RenderNode};
use proptest::prelude::*;

/// Answer text drawn from a small alphabet so that segments collide often.
fn answer_strategy() -> impl Strategy<Value = String> {
    "[ab *#\\-\\n]{0,40}"
}

fn source_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("kb-1".to_string())),
        Just(Some("kb-2".to_string())),
        Just(Some("  ".to_string())),
    ]
}

fn raw_strategy() -> impl Strategy<Value = Vec<RawSegment>> {
    prop::collection::vec(
        ("[ab *]{0,6}", source_strategy(), source_strategy()).prop_map(
            |(segment_text, source_id, source_title)| RawSegment {
                segment_text,
                source_id,
                source_title,
            },
        ),
        0..8,
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

proptest! {
    #[test]
    fn test_reconciled_stream_covers_answer(text in answer_strategy(), raw in raw_strategy()) {
        let stream = reconcile(&text, &raw);
        prop_assert_eq!(stream.text(), text);
        prop_assert!(stream.iter().all(|s| !s.text.is_empty()));
    }

    #[test]
    fn test_no_adjacent_segments_share_a_source(
        text in answer_strategy(),
        raw in raw_strategy(),
    ) {
        let stream = reconcile(&text, &raw);
        for pair in stream.segments().windows(2) {
            prop_assert!(!pair[0].same_source(&pair[1]));
        }
    }

    #[test]
    fn test_attributed_segments_keep_answer_and_input_order(
        text in answer_strategy(),
        raw in raw_strategy(),
    ) {
        let stream = reconcile(&text, &raw);

        let mut offset = 0;
        let mut last_start: Option<usize> = None;
        for segment in &stream {
            prop_assert!(text[offset..].starts_with(segment.text.as_str()));
            if segment.is_attributed() {
                prop_assert!(last_start.is_none_or(|last| last < offset));
                last_start = Some(offset);
            }
            offset += segment.text.len();
        }

        // Sources appear in the order the analyzer listed them.
        let mut listed = raw.iter();
        for segment in stream.iter().filter(|s| s.is_attributed()) {
            let found = listed.any(|r| {
                non_blank(r.source_id.as_deref()) == segment.source_id.as_deref()
                    && non_blank(r.source_title.as_deref()) == segment.source_title.as_deref()
            });
            prop_assert!(found);
        }
    }

    #[test]
    fn test_reconciliation_is_idempotent(text in answer_strategy(), raw in raw_strategy()) {
        let first = reconcile(&text, &raw);
        let second = reconcile(&text, &first.to_raw());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_alignment_conserves_leaf_characters(
        text in "[a-z ]{1,30}",
        raw in raw_strategy(),
        leaf in "[a-z ]{1,30}",
    ) {
        let stream = reconcile(&text, &raw);
        let tree = RenderNode::root(vec![RenderNode::element("p", vec![RenderNode::text(leaf.clone())])]);

        let out = align(tree, &stream);

        prop_assert_eq!(out.visible_text(), leaf.clone());
        if stream.has_attribution() {
            let total: usize = annotated_spans(&out)
                .iter()
                .map(|span| span.visible_text().chars().count())
                .sum();
            prop_assert_eq!(total, leaf.chars().count());
        }
    }

    #[test]
    fn test_unrelated_leaf_degrades_to_plain_text(
        text in "[a-z ]{1,30}",
        raw in raw_strategy(),
        leaf in "[ ]{0,3}[A-Z0-9][A-Z0-9 ]{0,26}",
    ) {
        let stream = reconcile(&text, &raw);
        let tree = RenderNode::root(vec![RenderNode::element("p", vec![RenderNode::text(leaf.clone())])]);

        let out = align(tree, &stream);

        prop_assert_eq!(out.visible_text(), leaf);
        prop_assert_eq!(count_attributed_spans(&out), 0);
    }
}
