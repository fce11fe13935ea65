use super::*;

#[test]
fn test_rect_edges() {
    let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
    assert_eq!(rect.left(), 10.0);
    assert_eq!(rect.top(), 20.0);
    assert_eq!(rect.right(), 110.0);
    assert_eq!(rect.bottom(), 70.0);
}

#[test]
fn test_rect_area() {
    assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_empty());
    assert!(!Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
    assert!(!Rect::new(0.0, 0.0, 10.0, 0.0).has_area());
    assert!(Rect::new(5.0, 5.0, 1.0, 1.0).has_area());
}

#[test]
fn test_rect_translate() {
    let rect = Rect::new(1.0, 2.0, 3.0, 4.0).translate(10.0, -2.0);
    assert_eq!(rect, Rect::new(11.0, 0.0, 3.0, 4.0));
}

#[test]
fn test_frame_id_display() {
    let id = FrameId::new("frame-7");
    assert_eq!(id.to_string(), "frame-7");
    assert_eq!(id.as_str(), "frame-7");
    assert_eq!(FrameId::from("frame-7"), id);
}

#[test]
fn test_style_default_is_inline_visible() {
    let style = ComputedStyle::default();
    assert!(style.is_inline());
    assert!(style.is_visibility_visible());
    assert!(!style.is_display_contents());
}

#[test]
fn test_node_id_serialization() {
    let json = serde_json::to_string(&NodeId(42)).unwrap();
    assert_eq!(json, "42");
    let back: NodeId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, NodeId(42));
}
