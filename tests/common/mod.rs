#![allow(dead_code)]

use avrocast::reflect::{FromNative, IntoNative, Member, Native, Reflect, Typed};
use avrocast::{reflect_enum, reflect_record, reflect_trait, AvroCastResult, Schema};
use chrono::{DateTime, Months, Utc};
use std::collections::HashMap;
use std::str::FromStr;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn schema(text: &str) -> Schema {
    Schema::from_str(text).unwrap()
}

///////////////////////////////////////////////////////////////////////////////
/// Shapes
///////////////////////////////////////////////////////////////////////////////

pub(crate) trait Shape: Reflect {
    fn name(&self) -> Option<&str>;
    fn tag(&self) -> Option<&str>;
}

reflect_trait!("shapes.Shape" => dyn Shape);

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) enum BasicColor {
    #[default]
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

reflect_enum!("shapes.BasicColor" => BasicColor {
    Red, Orange, Yellow, Green, Blue, Indigo, Violet
});

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Circle {
    pub name: Option<String>,
    pub radius: f64,
    pub color: BasicColor,
    pub tag: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Square {
    pub name: Option<String>,
    pub width: f64,
    pub color: BasicColor,
    pub tag: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Triangle {
    pub name: Option<String>,
    pub side_a: f64,
    pub side_b: f64,
    pub side_c: f64,
    pub color: BasicColor,
    pub tag: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct StrangeShape {
    pub name: Option<String>,
    pub child_shape: Option<Box<dyn Shape>>,
    pub tag: Option<String>,
}

macro_rules! impl_shape {
    ($($ty:ty),*) => {
        $(
            impl Shape for $ty {
                fn name(&self) -> Option<&str> {
                    self.name.as_deref()
                }
                fn tag(&self) -> Option<&str> {
                    self.tag.as_deref()
                }
            }
        )*
    };
}

impl_shape!(Circle, Square, Triangle, StrangeShape);

reflect_record!("shapes.Circle" => Circle as [dyn Shape] {
    name: Option<String>,
    radius: f64,
    color: BasicColor,
    tag: Option<String>,
});

reflect_record!("shapes.Square" => Square as [dyn Shape] {
    name: Option<String>,
    width: f64,
    color: BasicColor,
    tag: Option<String>,
});

reflect_record!("shapes.Triangle" => Triangle as [dyn Shape] {
    name: Option<String>,
    side_a: f64,
    side_b: f64,
    side_c: f64,
    color: BasicColor,
    tag: Option<String>,
});

reflect_record!("shapes.StrangeShape" => StrangeShape as [dyn Shape] {
    name: Option<String>,
    child_shape: Option<Box<dyn Shape>>,
    tag: Option<String>,
});

#[derive(Debug, Default)]
pub(crate) struct ShapeBasket {
    pub shapes: Vec<Box<dyn Shape>>,
}

reflect_record!("shapes.ShapeBasket" => ShapeBasket { shapes: Vec<Box<dyn Shape>> });

pub(crate) fn shape_basket(tagged: bool) -> ShapeBasket {
    let tag = |t: &str| Some(t.to_string()).filter(|_| tagged);
    let child_square: Box<dyn Shape> = Box::new(Square {
        name: Some("Child Square".to_string()),
        width: 50.0,
        tag: tag("CS"),
        ..Square::default()
    });
    let child_blob: Box<dyn Shape> = Box::new(StrangeShape {
        name: Some("Child Blob".to_string()),
        child_shape: Some(child_square),
        tag: tag("CB"),
    });

    let mut shapes: Vec<Box<dyn Shape>> = Vec::new();
    shapes.push(Box::new(Circle {
        tag: tag("C"),
        ..Circle::default()
    }));
    shapes.push(Box::new(Circle {
        name: Some("Red Dot".to_string()),
        radius: 15.0,
        color: BasicColor::Red,
        tag: tag("RD"),
    }));
    shapes.push(Box::new(Square {
        name: Some("Blue Square".to_string()),
        width: 20.0,
        color: BasicColor::Blue,
        tag: tag("BS"),
    }));
    shapes.push(Box::new(Triangle {
        name: Some("Bermuda Triangle".to_string()),
        side_a: 10.0,
        side_b: 20.0,
        side_c: 30.0,
        color: BasicColor::Indigo,
        tag: tag("BT"),
    }));
    shapes.push(Box::new(StrangeShape {
        name: Some("Blob".to_string()),
        child_shape: Some(child_blob),
        tag: tag("B"),
    }));
    ShapeBasket { shapes }
}

pub(crate) fn downcast<T: Reflect>(shape: &dyn Shape) -> &T {
    shape.as_any().downcast_ref::<T>().unwrap()
}

pub(crate) const SHAPE_BASKET_V1: &str = r##"
{
    "type": "record",
    "name": "ShapeBasket",
    "namespace": "shapes",
    "fields": [
        {
            "name": "shapes",
            "type": {
                "type": "array",
                "items": [
                    {
                        "type": "record",
                        "name": "Circle",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "radius", "type": ["null", "double"]},
                            {
                                "name": "color",
                                "type": {
                                    "type": "enum",
                                    "name": "BasicColor",
                                    "symbols": ["Red", "Orange", "Yellow", "Green", "Blue", "Indigo", "Violet"]
                                }
                            }
                        ]
                    },
                    {
                        "type": "record",
                        "name": "Square",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "width", "type": "double"},
                            {"name": "color", "type": "BasicColor"}
                        ]
                    },
                    {
                        "type": "record",
                        "name": "Triangle",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "side_a", "type": "double"},
                            {"name": "side_b", "type": "double"},
                            {"name": "side_c", "type": "double"},
                            {"name": "color", "type": "BasicColor"}
                        ]
                    },
                    {
                        "type": "record",
                        "name": "StrangeShape",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "child_shape", "type": ["null", "Circle", "Square", "Triangle", "StrangeShape"]}
                        ]
                    }
                ]
            }
        }
    ]
}
"##;

// Every shape gained a `tag`.
pub(crate) const SHAPE_BASKET_V2: &str = r##"
{
    "type": "record",
    "name": "ShapeBasket",
    "namespace": "shapes",
    "fields": [
        {
            "name": "shapes",
            "type": {
                "type": "array",
                "items": [
                    {
                        "type": "record",
                        "name": "Circle",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "radius", "type": ["null", "double"]},
                            {
                                "name": "color",
                                "type": {
                                    "type": "enum",
                                    "name": "BasicColor",
                                    "symbols": ["Red", "Orange", "Yellow", "Green", "Blue", "Indigo", "Violet"]
                                }
                            },
                            {"name": "tag", "type": ["null", "string"], "default": null}
                        ]
                    },
                    {
                        "type": "record",
                        "name": "Square",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "width", "type": "double"},
                            {"name": "color", "type": "BasicColor"},
                            {"name": "tag", "type": ["null", "string"], "default": null}
                        ]
                    },
                    {
                        "type": "record",
                        "name": "Triangle",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "side_a", "type": "double"},
                            {"name": "side_b", "type": "double"},
                            {"name": "side_c", "type": "double"},
                            {"name": "color", "type": "BasicColor"},
                            {"name": "tag", "type": ["null", "string"], "default": null}
                        ]
                    },
                    {
                        "type": "record",
                        "name": "StrangeShape",
                        "fields": [
                            {"name": "name", "type": ["null", "string"]},
                            {"name": "child_shape", "type": ["null", "Circle", "Square", "Triangle", "StrangeShape"]},
                            {"name": "tag", "type": ["null", "string"], "default": null}
                        ]
                    }
                ]
            }
        }
    ]
}
"##;

///////////////////////////////////////////////////////////////////////////////
/// Primitives
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, PartialEq)]
pub(crate) struct GenericType<T> {
    pub generic_instance: T,
    pub generic_array: Box<[T]>,
    pub generic_list: Vec<T>,
    pub generic_map: HashMap<String, T>,
}

macro_rules! reflect_generic_type {
    ($($t:ty),* $(,)?) => {
        $(
            reflect_record!("generic.GenericType" => GenericType<$t> {
                generic_instance: $t,
                generic_array: Box<[$t]>,
                generic_list: Vec<$t>,
                generic_map: HashMap<String, $t>,
            });
        )*
    };
}

reflect_generic_type!(String, i32, i64, f32, f64, bool, DateTime<Utc>);

impl<T: Clone> GenericType<T> {
    pub(crate) fn of(instance: T, first: T, second: T) -> Self {
        let mut generic_map = HashMap::new();
        generic_map.insert("1".to_string(), first.clone());
        generic_map.insert("2".to_string(), second.clone());
        GenericType {
            generic_instance: instance,
            generic_array: vec![first.clone(), second.clone()].into_boxed_slice(),
            generic_list: vec![first, second],
            generic_map,
        }
    }
}

pub(crate) const GENERIC_SCHEMA_TEMPLATE: &str = r##"
{
    "type": "record",
    "name": "GenericType",
    "namespace": "generic",
    "fields": [
        {"name": "generic_instance", "type": "{type}"},
        {"name": "generic_array", "type": {"type": "array", "items": "{type}"}},
        {"name": "generic_list", "type": {"type": "array", "items": "{type}"}},
        {"name": "generic_map", "type": {"type": "map", "values": "{type}"}}
    ]
}
"##;

pub(crate) fn generic_schema(avro_type: &str) -> Schema {
    schema(&GENERIC_SCHEMA_TEMPLATE.replace("{type}", avro_type))
}

#[derive(Debug, Default)]
pub(crate) struct PrimitiveTypeDefaults {
    pub boolean: bool,
    pub int: i32,
    pub long: i64,
    pub float: f32,
    pub double: f64,
    pub string: Option<String>,
}

reflect_record!("defaults.PrimitiveTypeDefaults" => PrimitiveTypeDefaults {
    boolean: bool,
    int: i32,
    long: i64,
    float: f32,
    double: f64,
    string: Option<String>,
});

pub(crate) const PRIMITIVE_TYPE_DEFAULTS: &str = r##"
{
    "type": "record",
    "name": "PrimitiveTypeDefaults",
    "namespace": "defaults",
    "fields": [
        {"name": "boolean", "type": "boolean", "default": true},
        {"name": "int", "type": "int", "default": 123},
        {"name": "long", "type": "long", "default": 345},
        {"name": "float", "type": "float", "default": 567},
        {"name": "double", "type": "double", "default": 789},
        {"name": "string", "type": "string", "default": "Hello There!"}
    ]
}
"##;

#[derive(Debug, Default)]
pub(crate) struct NullableTypeDefaults {
    pub boolean: Option<bool>,
    pub int: Option<i32>,
    pub long: Option<i64>,
    pub float: Option<f32>,
    pub double: Option<f64>,
    pub string: Option<String>,
}

reflect_record!("defaults.NullableTypeDefaults" => NullableTypeDefaults {
    boolean: Option<bool>,
    int: Option<i32>,
    long: Option<i64>,
    float: Option<f32>,
    double: Option<f64>,
    string: Option<String>,
});

pub(crate) const NULLABLE_TYPE_DEFAULTS: &str = r##"
{
    "type": "record",
    "name": "NullableTypeDefaults",
    "namespace": "defaults",
    "fields": [
        {"name": "boolean", "type": ["boolean", "null"], "default": true},
        {"name": "int", "type": ["int", "null"], "default": 123},
        {"name": "long", "type": ["long", "null"], "default": 345},
        {"name": "float", "type": ["float", "null"], "default": 567},
        {"name": "double", "type": ["double", "null"], "default": 789},
        {"name": "string", "type": ["string", "null"], "default": "Hello There!"}
    ]
}
"##;

///////////////////////////////////////////////////////////////////////////////
/// Secret message
///////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Default, PartialEq)]
pub(crate) struct SecretMessage {
    pub id: String,
    pub message: String,
}

reflect_record!("secrets.SecretMessage" => SecretMessage { id: String, message: String });

pub(crate) const SECRET_MESSAGE: &str = r##"
{
    "type": "record",
    "name": "SecretMessage",
    "namespace": "secrets",
    "fields": [
        {"name": "id", "type": "string"},
        {"name": "message", "type": "string"}
    ]
}
"##;

///////////////////////////////////////////////////////////////////////////////
/// Trade request
///////////////////////////////////////////////////////////////////////////////

pub(crate) trait Trade: Reflect {
    fn name(&self) -> &str;
    fn apply_binding(&mut self);
    fn expiry_date(&self) -> Option<DateTime<Utc>>;
}

reflect_trait!("trading.Trade" => dyn Trade);

/// A tenor only yields a date once bound.
#[derive(Debug, Default)]
pub(crate) struct Tenor {
    tenor_in_months: i32,
    date_time_value: Option<DateTime<Utc>>,
}

impl Tenor {
    pub(crate) fn new(tenor_in_months: i32) -> Self {
        Tenor {
            tenor_in_months,
            date_time_value: None,
        }
    }

    pub(crate) fn apply_binding(&mut self) {
        self.date_time_value = u32::try_from(self.tenor_in_months)
            .ok()
            .and_then(|months| Utc::now().checked_add_months(Months::new(months)));
    }

    pub(crate) fn date_time_value(&self) -> Option<DateTime<Utc>> {
        self.date_time_value
    }
}

// No public members: the months are bound through a hook.
reflect_record!("trading.Tenor" => Tenor {});

#[derive(Debug, Default)]
pub(crate) struct Vanilla {
    pub expiry_date: DateTime<Utc>,
    tenor: Option<Tenor>,
}

impl Vanilla {
    pub(crate) fn set_tenor(&mut self, tenor: Tenor) {
        self.tenor = Some(tenor);
    }

    pub(crate) fn has_tenor(&self) -> bool {
        self.tenor.is_some()
    }
}

impl Trade for Vanilla {
    fn name(&self) -> &str {
        "Vanilla Option"
    }

    fn apply_binding(&mut self) {
        if let Some(tenor) = self.tenor.as_mut() {
            tenor.apply_binding();
        }
    }

    fn expiry_date(&self) -> Option<DateTime<Utc>> {
        match &self.tenor {
            Some(tenor) => tenor.date_time_value(),
            None => Some(self.expiry_date),
        }
    }
}

reflect_record!("trading.Vanilla" => Vanilla as [dyn Trade] { expiry_date: DateTime<Utc> });

#[derive(Debug, Default)]
pub(crate) struct TradeRequest {
    pub trade: Option<Box<dyn Trade>>,
}

impl TradeRequest {
    pub(crate) fn apply_binding(&mut self) {
        if let Some(trade) = self.trade.as_mut() {
            trade.apply_binding();
        }
    }
}

reflect_record!("trading.TradeRequest" => TradeRequest { trade: Option<Box<dyn Trade>> });

fn get_vanilla_tenor(obj: &dyn Reflect) -> Native<'_> {
    match obj.as_any().downcast_ref::<Vanilla>() {
        Some(vanilla) => vanilla.tenor.to_native(),
        None => Native::Null,
    }
}

fn set_vanilla_tenor(obj: &mut dyn Reflect, value: Native<'static>) -> AvroCastResult<()> {
    if let Some(vanilla) = obj.as_any_mut().downcast_mut::<Vanilla>() {
        vanilla.tenor = Option::<Tenor>::from_native(value)?;
    }
    Ok(())
}

fn get_tenor_months(obj: &dyn Reflect) -> Native<'_> {
    match obj.as_any().downcast_ref::<Tenor>() {
        Some(tenor) => tenor.tenor_in_months.to_native(),
        None => Native::Null,
    }
}

fn set_tenor_months(obj: &mut dyn Reflect, value: Native<'static>) -> AvroCastResult<()> {
    if let Some(tenor) = obj.as_any_mut().downcast_mut::<Tenor>() {
        tenor.tenor_in_months = i32::from_native(value)?;
    }
    Ok(())
}

/// Accessor for the private tenor of a [`Vanilla`].
pub(crate) const VANILLA_TENOR: Member = Member::new(
    "_tenor",
    <Option<Tenor> as Typed>::native_type,
    get_vanilla_tenor,
    set_vanilla_tenor,
);

/// Accessor for the private month count of a [`Tenor`].
pub(crate) const TENOR_MONTHS: Member = Member::new(
    "_tenor_in_months",
    <i32 as Typed>::native_type,
    get_tenor_months,
    set_tenor_months,
);

pub(crate) const TRADE_REQUEST: &str = r##"
{
    "type": "record",
    "name": "TradeRequest",
    "namespace": "trading",
    "fields": [
        {
            "name": "trade",
            "type": ["null", {
                "type": "record",
                "name": "Vanilla",
                "fields": [
                    {
                        "name": "_tenor",
                        "type": ["null", {
                            "type": "record",
                            "name": "Tenor",
                            "fields": [{"name": "_tenor_in_months", "type": "int"}]
                        }]
                    },
                    {"name": "expiry_date", "type": "long"}
                ]
            }]
        }
    ]
}
"##;
