use super::*;
use crate::foundation::ids::CategoryId;

#[test]
fn numeric_thresholds_are_exclusive_upper_bounds() {
    let bounds = [Value::Number(10.0), Value::Number(20.0)];
    assert_eq!(bucket_index(&Value::Number(-5.0), &bounds, false), 0);
    assert_eq!(bucket_index(&Value::Number(10.0), &bounds, false), 1);
    assert_eq!(bucket_index(&Value::Number(19.9), &bounds, false), 1);
    assert_eq!(bucket_index(&Value::Number(20.0), &bounds, false), 2);
    assert_eq!(bucket_index(&Value::Number(f64::NAN), &bounds, false), 2);
}

#[test]
fn categories_match_by_id() {
    let bounds = [
        Value::Category(CategoryId(4)),
        Value::Category(CategoryId(1)),
    ];
    assert_eq!(bucket_index(&Value::Category(CategoryId(1)), &bounds, true), 1);
    assert_eq!(bucket_index(&Value::Category(CategoryId(4)), &bounds, true), 0);
    assert_eq!(bucket_index(&Value::Category(CategoryId(9)), &bounds, true), 2);
    assert_eq!(bucket_index(&Value::Null, &bounds, true), 2);
}
