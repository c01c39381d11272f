use super::*;

#[test]
fn loads_keyframe_form() {
    let json = r##"{
        "categories": [{"id": "A", "label": "Alpha", "color": "#ff0000"}],
        "keyframes": [
            {"time": 0, "values": {"A": 10, "B": 5}},
            {"time": 1, "values": {"A": 8, "B": 12}}
        ]
    }"##;
    let ds = Dataset::from_reader(json.as_bytes(), &Palette::default()).unwrap();
    assert_eq!(ds.keyframes().len(), 2);
    assert_eq!(ds.categories().len(), 2);
    assert_eq!(ds.category("A").unwrap().label, "Alpha");
}

#[test]
fn loads_rows_form_grouped_and_sorted() {
    let json = r#"{
        "rows": [
            {"time": 2001, "name": "x", "value": 3},
            {"time": 2000, "name": "x", "value": 1},
            {"time": 2000, "name": "y", "value": 2}
        ]
    }"#;
    let ds = Dataset::from_reader(json.as_bytes(), &Palette::default()).unwrap();
    let times: Vec<f64> = ds.keyframes().iter().map(|k| k.time).collect();
    assert_eq!(times, [2000.0, 2001.0]);
    assert_eq!(ds.keyframes()[0].values.len(), 2);
    assert!(!ds.keyframes()[1].values.contains_key("y"));
    let ids: Vec<&str> = ds.categories().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["x", "y"]);
}

#[test]
fn rejects_duplicate_rows() {
    let json = r#"{"rows": [
        {"time": 1, "name": "x", "value": 3},
        {"time": 1, "name": "x", "value": 4}
    ]}"#;
    let err = Dataset::from_reader(json.as_bytes(), &Palette::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate row"));
}

#[test]
fn malformed_json_is_invalid_dataset() {
    let err = Dataset::from_reader("{\"keyframes\": 3}".as_bytes(), &Palette::default())
        .unwrap_err();
    assert!(matches!(err, RaceError::InvalidDataset(_)));
}
