use super::*;
use crate::metadata::{CategoryStat, PropertyMeta};
use std::collections::BTreeMap;

fn metadata() -> Metadata {
    let mut cat = PropertyMeta::category(["car", "bus", "bike"]);
    cat.categories = vec![
        CategoryStat {
            name: "bus".to_owned(),
            frequency: 5,
        },
        CategoryStat {
            name: "car".to_owned(),
            frequency: 50,
        },
        CategoryStat {
            name: "bike".to_owned(),
            frequency: 1,
        },
    ];
    let mut props = BTreeMap::new();
    props.insert("vehicle".to_owned(), cat);
    props.insert("price".to_owned(), PropertyMeta::number(0.0, 10.0));
    Metadata::new(props, "id")
}

fn feature(pairs: &[(&str, PropertyValue)]) -> HashMap<String, PropertyValue> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

#[test]
fn numbers_read_through_and_missing_is_nan() {
    let meta = metadata();
    let mut node = PropertyNode::new("price");
    node.kind = Some(PropertyKind::Number);

    let f = feature(&[("price", PropertyValue::Number(3.5))]);
    assert_eq!(node.eval(&meta, &f), Value::Number(3.5));

    let f = feature(&[("price", PropertyValue::Text(" 7 ".to_owned()))]);
    assert_eq!(node.eval(&meta, &f), Value::Number(7.0));

    let empty = feature(&[]);
    assert!(node.eval(&meta, &empty).as_f64().is_nan());
}

#[test]
fn categories_resolve_to_shared_ids() {
    let meta = metadata();
    let mut node = PropertyNode::new("vehicle");
    node.kind = Some(PropertyKind::Category);

    let f = feature(&[("vehicle", PropertyValue::Text("bus".to_owned()))]);
    let id = meta.categories().id("bus").unwrap();
    assert_eq!(node.eval(&meta, &f), Value::Category(id));

    let f = feature(&[("vehicle", PropertyValue::Text("tram".to_owned()))]);
    assert_eq!(node.eval(&meta, &f), Value::Null);
}

#[test]
fn ranks_follow_frequency_order() {
    let meta = metadata();
    let ranks = category_ranks(&meta, "vehicle", None);
    let id = |n: &str| meta.categories().id(n).unwrap();
    assert_eq!(ranks[&id("car")], 0);
    assert_eq!(ranks[&id("bus")], 1);
    assert_eq!(ranks[&id("bike")], 2);

    let top = category_ranks(&meta, "vehicle", Some(2));
    assert_eq!(top.len(), 2);
    assert!(!top.contains_key(&id("bike")));
    assert!(category_ranks(&meta, "missing", None).is_empty());
}
