use super::{count_attributed_spans, RenderNode, IS_ATTRIBUTED_SEGMENT, SPAN_TAG};
use crate::segment::Attribution;
use serde_json::json;

#[test]
fn test_hast_json_round_trips_through_render_node() {
    let value = json!({
        "type": "root",
        "children": [{
            "type": "element",
            "tagName": "p",
            "properties": {"className": ["lead"]},
            "children": [{"type": "text", "value": "Hello"}]
        }]
    });

    let node: RenderNode = serde_json::from_value(value.clone()).unwrap();
    assert_eq!(node.visible_text(), "Hello");
    assert_eq!(serde_json::to_value(&node).unwrap(), value);
}

#[test]
fn test_missing_properties_and_children_default() {
    let node: RenderNode =
        serde_json::from_value(json!({"type": "element", "tagName": "br"})).unwrap();

    assert_eq!(node, RenderNode::element("br", vec![]));
}

#[test]
fn test_annotated_span_properties() {
    let attribution = Attribution {
        source_id: Some("kb-1".to_string()),
        source_title: Some("Geography".to_string()),
    };
    let span = RenderNode::annotated_span("capital", &attribution);

    let RenderNode::Element {
        tag,
        properties,
        children,
    } = &span
    else {
        panic!("expected element");
    };
    assert_eq!(tag, SPAN_TAG);
    assert_eq!(properties[IS_ATTRIBUTED_SEGMENT], json!(true));
    assert_eq!(properties["source_id"], json!("kb-1"));
    assert_eq!(properties["source_title"], json!("Geography"));
    assert_eq!(children, &vec![RenderNode::text("capital")]);
    assert!(span.is_attributed_span());
    assert_eq!(span.source_id(), Some("kb-1"));
}

#[test]
fn test_unattributed_span_has_no_source_properties() {
    let span = RenderNode::annotated_span("plain", &Attribution::default());

    assert!(span.is_annotated_span());
    assert!(!span.is_attributed_span());
    assert_eq!(span.source_id(), None);
}

#[test]
fn test_plain_span_is_not_annotated() {
    let span = RenderNode::element("span", vec![RenderNode::text("x")]);
    assert!(!span.is_annotated_span());
}

#[test]
fn test_count_attributed_spans_recurses() {
    let attributed = Attribution {
        source_id: Some("kb-1".to_string()),
        source_title: None,
    };
    let tree = RenderNode::root(vec![
        RenderNode::element(
            "p",
            vec![
                RenderNode::annotated_span("a", &attributed),
                RenderNode::annotated_span("b", &Attribution::default()),
            ],
        ),
        RenderNode::element(
            "ul",
            vec![RenderNode::element(
                "li",
                vec![RenderNode::annotated_span("c", &attributed)],
            )],
        ),
    ]);

    assert_eq!(count_attributed_spans(&tree), 2);
    assert_eq!(tree.visible_text(), "abc");
}
