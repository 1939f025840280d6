use super::{Schema, Variant};
use crate::error::AvroCastErr;
use crate::value::Value;
use std::collections::HashMap;
use std::str::FromStr;

fn primitive_schema_objects() -> HashMap<&'static str, Variant> {
    let mut s = HashMap::new();
    s.insert(r##"{ "type": "null" }"##, Variant::Null);
    s.insert(r##"{ "type": "boolean" }"##, Variant::Boolean);
    s.insert(r##"{ "type": "int" }"##, Variant::Int);
    s.insert(r##"{ "type": "long" }"##, Variant::Long);
    s.insert(r##"{ "type": "float" }"##, Variant::Float);
    s.insert(r##"{ "type": "double" }"##, Variant::Double);
    s.insert(r##"{ "type": "string" }"##, Variant::Str);
    s
}

fn primitive_schema_canonical() -> HashMap<&'static str, Variant> {
    let mut s = HashMap::new();
    s.insert(r##""null""##, Variant::Null);
    s.insert(r##""boolean""##, Variant::Boolean);
    s.insert(r##""int""##, Variant::Int);
    s.insert(r##""long""##, Variant::Long);
    s.insert(r##""float""##, Variant::Float);
    s.insert(r##""double""##, Variant::Double);
    s.insert(r##""string""##, Variant::Str);
    s
}

#[test]
fn parse_primitives_as_json_objects() {
    for (s, v) in primitive_schema_objects() {
        let schema = Schema::from_str(s).unwrap();
        assert_eq!(schema.variant, v);
    }
}

#[test]
fn parse_primitives_as_defined_types() {
    for (s, v) in primitive_schema_canonical() {
        let schema = Schema::from_str(s).unwrap();
        assert_eq!(schema.variant, v);
    }
}

#[test]
fn logical_types_parse_as_their_underlying_primitive() {
    let schema =
        Schema::from_str(r##"{"type": "long", "logicalType": "timestamp-micros"}"##).unwrap();
    assert_eq!(schema.variant, Variant::Long);
}

#[test]
fn bytes_and_fixed_are_unsupported() {
    assert!(matches!(
        Schema::from_str(r##""bytes""##),
        Err(AvroCastErr::UnsupportedSchema(_))
    ));
    assert!(matches!(
        Schema::from_str(r##"{"type": "fixed", "name": "md5", "size": 16}"##),
        Err(AvroCastErr::UnsupportedSchema(_))
    ));
}

#[test]
fn parse_record() {
    let record_schema = Schema::from_str(
        r##"{
        "type": "record",
        "name": "LongOrNull",
        "namespace":"com.test",
        "aliases": ["MaybeLong"],
        "fields" : [
            {"name": "value", "type": "long"},
            {"name": "other", "type": ["null", "LongOrNull"]}
        ]
    }"##,
    )
    .unwrap();

    let rec = record_schema.record().unwrap();
    assert_eq!(rec.fullname(), "com.test.LongOrNull");
    assert_eq!(rec.len(), 2);

    let value = rec.field("value").unwrap();
    assert_eq!(value.position(), 0);
    assert_eq!(value.ty(), &Variant::Long);
    assert!(value.default().is_none());

    let other = rec.field("other").unwrap();
    assert_eq!(other.position(), 1);
    assert_eq!(
        other.ty(),
        &Variant::Union(vec![
            Variant::Null,
            Variant::Named("com.test.LongOrNull".to_string())
        ])
    );

    // the recursive reference resolves to the record itself
    let named = Variant::Named("com.test.LongOrNull".to_string());
    let resolved = record_schema.names().resolve(&named).unwrap();
    assert_eq!(resolved, &record_schema.variant);
}

#[test]
fn field_order_is_declaration_order() {
    let schema = Schema::from_str(
        r##"{
        "type": "record",
        "name": "Ordered",
        "fields" : [
            {"name": "c", "type": "int"},
            {"name": "a", "type": "int"},
            {"name": "b", "type": "int"}
        ]
    }"##,
    )
    .unwrap();

    let names: Vec<_> = schema.record().unwrap().fields().map(|f| f.name()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn parse_enum() {
    let enum_schema = Schema::from_str(
        r##"{ "type": "enum",
        "name": "Suit",
        "namespace": "cards",
        "symbols" : ["SPADES", "HEARTS", "DIAMONDS", "CLUBS"]
    }"##,
    )
    .unwrap();

    match &enum_schema.variant {
        Variant::Enum(e) => {
            assert_eq!(e.fullname(), "cards.Suit");
            assert_eq!(e.symbols(), ["SPADES", "HEARTS", "DIAMONDS", "CLUBS"]);
        }
        other => panic!("expected an enum, got {:?}", other),
    }
    assert!(enum_schema.names().get("cards.Suit").is_some());
}

#[test]
#[should_panic(expected = "EnumSymbolsMissing")]
fn enum_without_symbols_fails() {
    Schema::from_str(r##"{"type": "enum", "name": "Suit"}"##).unwrap();
}

#[test]
fn parse_array() {
    let array_schema = Schema::from_str(r##"{"type": "array", "items": "string"}"##).unwrap();
    assert_eq!(array_schema.variant, Variant::Array(Box::new(Variant::Str)));
}

#[test]
fn parse_map() {
    let map_schema = Schema::from_str(r##"{"type": "map", "values": "long"}"##).unwrap();
    assert_eq!(map_schema.variant, Variant::Map(Box::new(Variant::Long)));
}

#[test]
fn root_must_be_a_record_for_whole_object_conversions() {
    let map_schema = Schema::from_str(r##"{"type": "map", "values": "long"}"##).unwrap();
    assert!(matches!(
        map_schema.record(),
        Err(AvroCastErr::InvalidSchema(_))
    ));
}

///////////////////////////////////////////////////////////////////////////////
/// Union
///////////////////////////////////////////////////////////////////////////////

#[test]
fn parse_simple_union() {
    let union_schema = Schema::from_str(r##"["null", "string"]"##).unwrap();
    assert_eq!(
        union_schema.variant,
        Variant::Union(vec![Variant::Null, Variant::Str])
    );
}

#[test]
fn parse_union_duplicate_primitive_fails() {
    for (s, _) in primitive_schema_canonical() {
        let json = &format!("[{}, {}]", s, s);
        assert!(Schema::from_str(json).is_err(), "{} accepted twice", s);
    }
}

#[test]
fn parse_union_with_two_distinct_arrays_succeeds() {
    let union_schema = Schema::from_str(
        r##"[{"type": "array", "items": "int"}, {"type": "array", "items": "string"}]"##,
    );
    assert!(union_schema.is_ok());
}

#[test]
fn parse_union_with_different_named_type_but_same_schema_succeeds() {
    let union_schema = Schema::from_str(
        r##"[
    {
        "type":"record",
        "name": "record_one",
        "fields" : [
            {"name": "value", "type": "long"}
        ]
    },
    {
        "type":"record",
        "name": "record_two",
        "fields" : [
            {"name": "value", "type": "long"}
        ]
    }]"##,
    );

    assert!(union_schema.is_ok());
}

#[test]
fn parse_union_with_same_named_type_fails() {
    let union_schema = Schema::from_str(
        r##"[
    {
        "type":"record",
        "name": "record_one",
        "fields" : [
            {"name": "value", "type": "long"}
        ]
    },
    {
        "type":"record",
        "name": "record_one",
        "fields" : [
            {"name": "value", "type": "long"}
        ]
    }]"##,
    );

    assert!(union_schema.is_err());
}

#[test]
#[should_panic(expected = "DuplicateSchemaInUnion")]
fn parse_immediate_unions_fails() {
    Schema::from_str(r##"["null", "string", ["null", "int"]]"##).unwrap();
}

///////////////////////////////////////////////////////////////////////////////
/// Defaults
///////////////////////////////////////////////////////////////////////////////

#[test]
fn parse_union_field_invalid_default_values() {
    let default_valued_schema = Schema::from_str(
        r##"
    {
        "name": "Company",
        "type": "record",
        "fields": [
            {
                "name": "emp_name",
                "type": "string"
            },
            {
                "name": "subordinates",
                "type": ["null", {"type": "map", "values": "string"}],
                "default": {"foo":"bar"}
            }
        ]
    }
    "##,
    );

    assert!(matches!(
        default_valued_schema,
        Err(AvroCastErr::DefaultValueParse(_))
    ));
}

#[test]
fn parse_simple_default_values_record() {
    let schema = Schema::from_str(
        r##"
    {
        "name": "com.school.Student",
        "type": "record",
        "fields": [
            {"name": "age", "type": "int", "default": 18},
            {"name": "ratio", "type": "float", "default": 0.5},
            {"name": "bonus", "type": ["null", "long"], "default": null},
            {
                "name": "departments",
                "type":[{"type":"array", "items":"string" }, "null"],
                "default": ["Computer Science", "Finearts"]
            }
        ]
    }
    "##,
    )
    .unwrap();

    let rec = schema.record().unwrap();
    assert_eq!(rec.field("age").unwrap().default(), Some(&Value::Int(18)));
    assert_eq!(rec.field("ratio").unwrap().default(), Some(&Value::Float(0.5)));
    assert_eq!(rec.field("bonus").unwrap().default(), Some(&Value::Null));
    assert_eq!(
        rec.field("departments").unwrap().default(),
        Some(&Value::Array(vec![
            Value::Str("Computer Science".to_string()),
            Value::Str("Finearts".to_string())
        ]))
    );
}

#[test]
fn int_default_out_of_range_fails() {
    let schema = Schema::from_str(
        r##"{"name": "Big", "type": "record",
            "fields": [{"name": "n", "type": "int", "default": 4294967296}]}"##,
    );
    assert!(matches!(schema, Err(AvroCastErr::DefaultValueParse(_))));
}

#[test]
fn enum_default_must_be_a_symbol() {
    let schema = Schema::from_str(
        r##"{"name": "Card", "type": "record",
            "fields": [{"name": "suit",
                "type": {"type": "enum", "name": "Suit", "symbols": ["SPADES", "HEARTS"]},
                "default": "CLUBS"}]}"##,
    );
    assert!(matches!(schema, Err(AvroCastErr::EnumSymbolNotPresent(_))));
}

#[test]
fn parse_default_record_value_in_union() {
    let schema = Schema::from_str(
        r##"
    {
        "name": "com.big.data.avro.schema.Employee",
        "type": "record",
        "fields": [
            {
                    "name": "departments",
                    "type":[
                        {"type":"record",
                        "name": "dept_name",
                        "fields":[{"name":"id","type": "string"}, {"name":"foo", "type": "null"}] }],
                    "default": {"id": "foo", "foo": null}
                }
            ]
        }
    "##,
    )
    .unwrap();

    let rec = schema.record().unwrap();
    match rec.field("departments").unwrap().default() {
        Some(Value::Record(r)) => {
            assert_eq!(r.name(), "com.big.data.avro.schema.dept_name");
            assert_eq!(r.get("id"), Some(&Value::Str("foo".to_string())));
            assert_eq!(r.get("foo"), Some(&Value::Null));
        }
        other => panic!("should be a record, got {:?}", other),
    }
}

///////////////////////////////////////////////////////////////////////////////
/// Names
///////////////////////////////////////////////////////////////////////////////

#[test]
fn nested_named_types_inherit_namespace() {
    let schema = Schema::from_str(
        r##"{
            "name": "longlist",
            "namespace": "com.some",
            "type":"record",
            "fields": [
                {"name": "kind", "type": {"type": "enum", "name": "kind", "namespace": "com.bar", "symbols": ["A"]}},
                {"name": "inner_rec", "type": {"type": "record", "name": "inner_rec", "fields": [
                    {"name": "test", "type": {"type": "enum", "name":"hello", "symbols": ["B"]}}
                ]}},
                {"name": "again", "type": "inner_rec"},
                {"name": "qualified", "type": "com.bar.kind"}
            ]
        }"##,
    )
    .unwrap();

    let names = schema.names();
    assert!(names.get("com.bar.kind").is_some());
    assert!(names.get("com.some.hello").is_some());
    assert!(names.get("com.some.longlist").is_some());
    assert!(names.get("com.some.inner_rec").is_some());

    let rec = schema.record().unwrap();
    assert_eq!(
        rec.field("again").unwrap().ty(),
        &Variant::Named("com.some.inner_rec".to_string())
    );
    assert_eq!(
        rec.field("qualified").unwrap().ty(),
        &Variant::Named("com.bar.kind".to_string())
    );
}

#[test]
#[should_panic(expected = "DuplicateSchema")]
fn fails_on_duplicate_schema() {
    let schema = r##"{
        "type": "record",
        "namespace": "test.avro.training",
        "name": "SomeMessage",
        "fields": [{
            "name": "is_error",
            "type": "boolean",
            "default": false
        }, {
            "name": "outcome",
            "type": [{
                "type": "record",
                "name": "SomeMessage",
                "fields": []
            }, {
                "type": "record",
                "name": "ErrorRecord",
                "fields": [{
                    "name": "errors",
                    "type": {
                        "type": "map",
                        "values": "string"
                    }
                }]
            }]
        }]
    }"##;

    Schema::from_str(schema).unwrap();
}

#[test]
#[should_panic(expected = "NamedSchemaNotFound")]
fn named_schema_must_be_defined_before_being_used() {
    let _schema = Schema::from_str(
        r##"{
        "type": "record",
        "name": "LongList",
        "fields" : [
          {"name": "value", "type": "long"},
          {"name": "next", "type": ["null", "OtherList"]}
        ]
      }"##,
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "InvalidName")]
fn field_names_follow_name_rules() {
    Schema::from_str(
        r##"{"type": "record", "name": "User",
            "fields": [{"name": "aa-i32", "type": "int"}]}"##,
    )
    .unwrap();
}

#[test]
fn test_two_instance_schema_equality() {
    let raw_schema = r#"
        {
        "type": "record",
        "name": "User",
        "doc": "Hi there.",
        "fields": [
            {"name": "likes_pizza", "type": "boolean", "default": false},
            {"name": "aa_i32",
            "type": {"type": "array", "items": {"type": "array", "items": "int"}},
            "default": [[0], [12, -1]]}
        ]
        }
    "#;

    let schema = Schema::from_str(raw_schema).unwrap();
    let schema2 = Schema::from_str(raw_schema).unwrap();
    assert_eq!(schema, schema2);
}

#[test]
#[should_panic(expected = "DuplicateField")]
fn duplicate_field_name_in_record_fails() {
    let raw_schema = r#"
        {
        "type": "record",
        "name": "Person",
        "fields": [
            {"name": "id", "type": "string", "default": "dsf8e8"},
            {"name": "id", "type": "int", "default": 56}
        ]
        }
    "#;

    Schema::from_str(raw_schema).unwrap();
}
