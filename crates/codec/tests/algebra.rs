//! Properties of the encoder/decoder combinators.

use proptest::prelude::*;
use typed_sql_codec::{
    primitive::{bool, float8, int4, int8, text},
    DecodeError, Decoder, Encoder, RawValue,
};

fn row_of(values: &[i64]) -> Vec<RawValue> {
    values.iter().map(|v| RawValue::Text(v.to_string())).collect()
}

proptest! {
    #[test]
    fn contramap_is_transparent(c in any::<(i32, bool)>()) {
        let enc = int8().encoder().clone();
        let f = |(n, flag): &(i32, bool)| if *flag { i64::from(*n) * 2 } else { i64::from(*n) };
        let mapped = enc.contramap(f);
        prop_assert_eq!(mapped.encode(&c).unwrap(), enc.encode(&f(&c)).unwrap());
        prop_assert_eq!(mapped.arity(), enc.arity());
    }

    #[test]
    fn map_is_transparent(n in any::<i64>()) {
        let dec = int8().decoder().clone();
        let g = |v: i64| v.to_string().len();
        let row = row_of(&[n]);
        let mapped = dec.map(g);
        prop_assert_eq!(mapped.decode(&row).unwrap(), g(dec.decode(&row).unwrap()));
        prop_assert_eq!(mapped.types(), dec.types());
    }

    #[test]
    fn product_of_codecs_round_trips(a in any::<i32>(), s in "[a-z ]{0,16}", flag in any::<bool>()) {
        let codec = int4().product(&text()).product(&bool());
        let value = ((a, s), flag);
        let slots = codec.encode(&value).unwrap();
        prop_assert_eq!(slots.len(), 3);
        prop_assert_eq!(codec.decode(&slots).unwrap(), value);
    }

    #[test]
    fn float8_round_trips(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let slots = float8().encode(&x).unwrap();
        prop_assert_eq!(float8().decode(&slots).unwrap(), x);
    }

    #[test]
    fn wrong_row_length_never_truncates_or_pads(values in prop::collection::vec(any::<i64>(), 0..6)) {
        let dec = int8().decoder().product(int8().decoder());
        let result = dec.decode(&row_of(&values));
        if values.len() == 2 {
            prop_assert_eq!(result.unwrap(), (values[0], values[1]));
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                DecodeError::RowLength { expected: 2, actual: values.len() }
            );
        }
    }
}

#[test]
fn arity_adds_under_product() {
    let e1 = int4().product(&text());
    let e2 = bool().product(&int8()).product(&float8());
    let encoder: Encoder<_> = e1.encoder().product(e2.encoder());
    assert_eq!(encoder.arity(), e1.arity() + e2.arity());

    let decoder: Decoder<_> = e1.decoder().product(e2.decoder());
    assert_eq!(decoder.arity(), 5);
    assert_eq!(&decoder.types()[..2], e1.types());
    assert_eq!(&decoder.types()[2..], e2.types());
}

#[test]
fn product_decode_splits_at_left_arity() {
    let left = int4().product(&int4());
    let right = text();
    let dec = left.decoder().product(right.decoder());
    let row = vec![RawValue::text("1"), RawValue::text("2"), RawValue::text("3")];
    assert_eq!(dec.decode(&row).unwrap(), ((1, 2), "3".to_string()));
}

#[test]
fn product_fails_fast_on_the_left() {
    let dec = int4().decoder().product(int4().decoder());
    let err = dec
        .decode(&[RawValue::text("x"), RawValue::text("y")])
        .unwrap_err();
    assert_eq!(err.column(), Some(0));
}

#[test]
fn remapping_never_changes_arity() {
    let codec = int4().product(&text());
    let enc = codec.encoder().contramap(|n: &i32| (*n, n.to_string()));
    let dec = codec.decoder().map(|(n, s)| format!("{n}:{s}"));
    assert_eq!(enc.arity(), 2);
    assert_eq!(dec.arity(), 2);
    assert_eq!(dec.decode(&enc.encode(&5).unwrap()).unwrap(), "5:5");
}
