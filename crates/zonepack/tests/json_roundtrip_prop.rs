use proptest::prelude::*;

use zonepack::{json, msgpack, Zone};

/// Recursive strategy over JSON-compatible documents. Floats are kept
/// finite; JSON has no representation for NaN or infinities.
fn json_doc() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<u64>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        proptest::num::f64::NORMAL.prop_map(serde_json::Value::from),
        ".{0,40}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
            prop::collection::vec((".{0,12}", inner), 0..8).prop_map(|pairs| {
                serde_json::Value::Object(pairs.into_iter().collect())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn json_round_trips_through_msgpack(doc in json_doc()) {
        let bytes = json::encode(&doc);
        let back = json::decode(&bytes).unwrap();
        prop_assert_eq!(back, doc);
    }

    #[test]
    fn both_front_ends_encode_identically(doc in json_doc()) {
        let zone = Zone::new();
        let direct = json::encode(&doc);
        let via_model = msgpack::encode(&json::to_zone(&doc, &zone));
        prop_assert_eq!(direct, via_model);
    }

    #[test]
    fn canonical_model_round_trips_structurally(doc in json_doc()) {
        let zone = Zone::new();
        let value = json::to_zone(&doc, &zone);
        let bytes = msgpack::encode(&value);
        let out_zone = Zone::new();
        let decoded = msgpack::decode_exact(&bytes, &out_zone).unwrap();
        prop_assert_eq!(decoded, value);
    }
}
