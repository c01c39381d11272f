use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(30, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
}

#[test]
fn inner_rect_subtracts_margins() {
    let canvas = Canvas {
        width: 200,
        height: 100,
    };
    let r = canvas.inner_rect(Margins {
        top: 10.0,
        right: 20.0,
        bottom: 5.0,
        left: 30.0,
    });
    assert_eq!(r, Rect::new(30.0, 10.0, 180.0, 95.0));
}

#[test]
fn inner_rect_never_inverts() {
    let canvas = Canvas {
        width: 10,
        height: 10,
    };
    let r = canvas.inner_rect(Margins {
        top: 8.0,
        right: 8.0,
        bottom: 8.0,
        left: 8.0,
    });
    assert!(r.width() >= 0.0);
    assert!(r.height() >= 0.0);
}

#[test]
fn premultiply_rounds() {
    let c = Rgba8 {
        r: 255,
        g: 128,
        b: 0,
        a: 128,
    };
    assert_eq!(c.premultiplied(), [128, 64, 0, 128]);
    assert_eq!(Rgba8::rgb(255, 0, 16).to_hex(), "#ff0010");
}

#[test]
fn category_ids_order_as_strings() {
    let mut ids = vec![CategoryId::from("b"), CategoryId::from("B"), "a".into()];
    ids.sort();
    let names: Vec<&str> = ids.iter().map(CategoryId::as_str).collect();
    assert_eq!(names, ["B", "a", "b"]);
}
