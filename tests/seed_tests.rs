use chrono::NaiveDate;
use form_autofill::{
    JsonLookup, Seed, SeedMode, StructuredLookup,
    fill::{
        resolver::{Provenance, ValueResolver},
        seed::{SHORT_DATE_FORMAT, classify, coerce},
    },
};
use serde::Serialize;
use serde_json::{Value, json};

// ============================================================================
// Classification
// ============================================================================

#[test]
fn scalars_are_simple() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    for seed in [
        Seed::from("text"),
        Seed::from(true),
        Seed::from(3),
        Seed::from(2.5),
        Seed::from(date),
        Seed::enumeration("Red", 1),
    ] {
        assert_eq!(classify(&seed), SeedMode::Simple, "{:?}", seed);
    }
}

#[test]
fn objects_arrays_and_null_are_structured() {
    assert_eq!(Seed::Null.mode(), SeedMode::Structured);
    assert_eq!(Seed::from(json!({ "a": 1 })).mode(), SeedMode::Structured);
    assert_eq!(Seed::from(json!([1, 2])).mode(), SeedMode::Structured);
}

#[test]
fn json_scalars_convert_to_matching_seed() {
    assert_eq!(Seed::from(json!("x")), Seed::Text("x".into()));
    assert_eq!(Seed::from(json!(7)), Seed::Int(7));
    assert_eq!(Seed::from(json!(1.5)), Seed::Float(1.5));
    assert_eq!(Seed::from(json!(false)), Seed::Bool(false));
    assert_eq!(Seed::from(Value::Null), Seed::Null);
}

#[test]
fn missing_option_is_null_seed() {
    assert_eq!(Seed::from(None::<&str>), Seed::Null);
    assert_eq!(Seed::from(Some("a")), Seed::Text("a".into()));
}

#[derive(Serialize)]
struct Profile {
    name: String,
    age: u32,
}

#[test]
fn models_serialize_to_structured_seed() {
    let seed = Seed::from_model(&Profile {
        name: "Ada".into(),
        age: 36,
    })
    .unwrap();

    assert_eq!(seed, Seed::Structured(json!({ "name": "Ada", "age": 36 })));
}

#[derive(Serialize)]
struct Code(u32);

#[test]
fn scalar_models_serialize_to_simple_seed() {
    assert_eq!(Seed::from_model(&Code(7)).unwrap(), Seed::Int(7));
    assert_eq!(Seed::from_model(&"plain").unwrap(), Seed::Text("plain".into()));
    assert_eq!(Seed::from_model(&Code(7)).unwrap().mode(), SeedMode::Simple);
}

// ============================================================================
// Rendering and coercion
// ============================================================================

#[test]
fn simple_seeds_render_for_fill() {
    let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
    assert_eq!(Seed::from(date).to_fill_string(), "12/25/2024");
    assert_eq!(Seed::from(true).to_fill_string(), "true");
    assert_eq!(Seed::from(-4).to_fill_string(), "-4");
    assert_eq!(Seed::enumeration("Blue", 3).to_fill_string(), "3");
    assert_eq!(Seed::Null.to_fill_string(), "");
}

#[test]
fn short_date_has_no_padding() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
    assert_eq!(date.format(SHORT_DATE_FORMAT).to_string(), "3/7/2024");
}

#[test]
fn strings_pass_through_coercion() {
    let date_seed = Seed::from(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    assert_eq!(coerce(&json!("as is"), &date_seed), "as is");
}

#[test]
fn coercion_follows_seed_type() {
    let date_seed = Seed::from(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    let enum_seed = Seed::enumeration("Gold", 2);

    assert_eq!(coerce(&json!(99), &date_seed), "3/7/2024");
    assert_eq!(coerce(&json!(99), &enum_seed), "2");
    assert_eq!(coerce(&json!(99), &Seed::Null), "99");
    assert_eq!(coerce(&json!(true), &Seed::Null), "true");
}

// ============================================================================
// Lookup and resolution
// ============================================================================

#[test]
fn lookup_prefers_exact_key() {
    let seed = Seed::from(json!({ "Email": "upper", "email": "exact" }));
    assert_eq!(JsonLookup.lookup(&seed, None, "email"), Some(json!("exact")));
}

#[test]
fn lookup_treats_null_as_absent() {
    let seed = Seed::from(json!({ "email": null }));
    assert_eq!(JsonLookup.lookup(&seed, None, "email"), None);
}

#[test]
fn lookup_searches_scope_then_root() {
    let seed = Seed::from(json!({
        "city": "root city",
        "zip": "00000",
        "address": { "city": "scoped city" }
    }));

    assert_eq!(JsonLookup.lookup(&seed, Some("address"), "city"), Some(json!("scoped city")));
    assert_eq!(JsonLookup.lookup(&seed, Some("address"), "zip"), Some(json!("00000")));
    assert_eq!(JsonLookup.lookup(&seed, None, "city"), Some(json!("root city")));
}

#[test]
fn lookup_on_scalar_seed_finds_nothing() {
    assert_eq!(JsonLookup.lookup(&Seed::from("x"), None, "x"), None);
    assert_eq!(JsonLookup.lookup(&Seed::Null, None, "x"), None);
}

#[test]
fn resolver_applies_simple_seed_regardless_of_key() {
    let seed = Seed::from("same");
    let resolver = ValueResolver::new(&seed, &JsonLookup);

    for key in [Some("a"), Some("b"), None] {
        let decision = resolver.resolve(key).unwrap();
        assert_eq!(decision.value, "same");
        assert_eq!(decision.provenance, Provenance::SeedSimple);
    }
}

#[test]
fn resolver_looks_up_structured_seed() {
    let seed = Seed::from(json!({ "age": 30 }));
    let resolver = ValueResolver::new(&seed, &JsonLookup);

    let decision = resolver.resolve(Some("age")).unwrap();
    assert_eq!(decision.value, "30");
    assert_eq!(decision.provenance, Provenance::SeedLookup);
    assert!(resolver.resolve(Some("missing")).is_none());
    assert!(resolver.resolve(None).is_none());
}

#[test]
fn resolver_parses_flags_case_insensitively() {
    let seed = Seed::from(json!({ "a": "TRUE", "b": "False", "c": true, "d": "on" }));
    let resolver = ValueResolver::new(&seed, &JsonLookup);

    assert_eq!(resolver.resolve_flag(Some("a")), Some(true));
    assert_eq!(resolver.resolve_flag(Some("b")), Some(false));
    assert_eq!(resolver.resolve_flag(Some("c")), Some(true));
    assert_eq!(resolver.resolve_flag(Some("d")), None);
    assert_eq!(resolver.resolve_flag(None), None);
}
