use super::{f64_values, names, strings};
use crate::analyser::logic::*;
use anyhow::Result;
use polars::prelude::*;

fn colors() -> Result<DataFrame> {
    Ok(df![
        "id" => [1i64, 2, 3, 4],
        "color" => ["red", "blue", "red", "blue"],
        "size" => [10i64, 2, 33, 2],
    ]?)
}

#[test]
fn test_one_hot_replaces_column_in_place() -> Result<()> {
    let out = one_hot_encode(&colors()?, &strings(&["color"]))?;

    assert_eq!(names(&out), strings(&["id", "color_red", "color_blue", "size"]));
    assert_eq!(out.column("color_red")?.dtype(), &DataType::Int32);

    let red = f64_values(&out, "color_red")?;
    let blue = f64_values(&out, "color_blue")?;
    for (r, b) in red.iter().zip(&blue) {
        assert_eq!(r.unwrap_or_default() + b.unwrap_or_default(), 1.0);
    }
    assert_eq!(red, vec![Some(1.0), Some(0.0), Some(1.0), Some(0.0)]);
    Ok(())
}

#[test]
fn test_one_hot_null_row_is_all_zero() -> Result<()> {
    let df = df!["c" => [Some("x"), None, Some("y")]]?;
    let out = one_hot_encode(&df, &strings(&["c"]))?;

    assert_eq!(names(&out), strings(&["c_x", "c_y"]));
    assert_eq!(f64_values(&out, "c_x")?.get(1).copied().flatten(), Some(0.0));
    assert_eq!(f64_values(&out, "c_y")?.get(1).copied().flatten(), Some(0.0));
    Ok(())
}

#[test]
fn test_label_codes_follow_sorted_order() -> Result<()> {
    let out = label_encode(&colors()?, &strings(&["color", "size"]))?;

    assert_eq!(out.column("color")?.dtype(), &DataType::Int64);
    assert_eq!(
        f64_values(&out, "color")?,
        vec![Some(1.0), Some(0.0), Some(1.0), Some(0.0)]
    );
    // numeric order, not text order ("10" < "2")
    assert_eq!(
        f64_values(&out, "size")?,
        vec![Some(1.0), Some(0.0), Some(2.0), Some(0.0)]
    );
    Ok(())
}

#[test]
fn test_label_encode_smallest_and_largest() -> Result<()> {
    let df = df!["grade" => [Some("c"), Some("a"), None, Some("b"), Some("e")]]?;
    let out = label_encode(&df, &strings(&["grade"]))?;

    let codes = f64_values(&out, "grade")?;
    assert_eq!(codes.get(1).copied().flatten(), Some(0.0));
    assert_eq!(codes.get(4).copied().flatten(), Some(3.0));
    assert_eq!(codes.get(2).copied().flatten(), None);
    Ok(())
}

#[test]
fn test_encode_dispatch_and_empty_selection() -> Result<()> {
    let df = colors()?;
    assert!(encode(&df, &[], EncodingMethod::OneHot)?.equals_missing(&df));

    let out = encode(&df, &strings(&["color"]), EncodingMethod::Label)?;
    assert_eq!(out.width(), df.width());
    Ok(())
}

#[test]
fn test_encoding_unknown_column_fails() -> Result<()> {
    let df = colors()?;
    assert!(one_hot_encode(&df, &strings(&["shape"])).is_err());
    assert!(label_encode(&df, &strings(&["color", "shape"])).is_err());
    Ok(())
}
