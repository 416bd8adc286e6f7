// Bike factory: maps a type tag to the constructor for that variant

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    bike::{Bike, ElectricBike, MountainBike, RoadBike},
    error::{RentalError, Result},
};

pub const TYPE_FIELD: &str = "type";
pub const MODEL_FIELD: &str = "model";
pub const PRICE_FIELD: &str = "price_per_hour";
pub const BATTERY_FIELD: &str = "battery_capacity";

// Loosely typed description of a bike to add, as received from a caller.
//
// Any JSON object deserializes into it, e.g.
// `{"type": "road", "model": "Specialized Allez", "price_per_hour": 12.0}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BikeData(Map<String, Value>);

impl BikeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    fn field(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|value| !value.is_null())
    }

    // Absent is fine here, the caller decides on a default.
    pub fn type_tag(&self) -> Result<Option<&str>> {
        match self.field(TYPE_FIELD) {
            None => Ok(None),
            Some(Value::String(tag)) => Ok(Some(tag.as_str())),
            Some(_) => Err(invalid(TYPE_FIELD, "expected a string")),
        }
    }

    pub fn required_str(&self, field: &str) -> Result<&str> {
        match self.field(field) {
            None => Err(RentalError::MissingField(field.to_string())),
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(_) => Err(invalid(field, "expected a string")),
        }
    }

    pub fn required_f64(&self, field: &str) -> Result<f64> {
        let value = self
            .field(field)
            .ok_or_else(|| RentalError::MissingField(field.to_string()))?;

        value
            .as_f64()
            .ok_or_else(|| invalid(field, "expected a number"))
    }

    pub fn required_non_negative(&self, field: &str) -> Result<f64> {
        let value = self.required_f64(field)?;
        if value < 0.0 {
            return Err(invalid(field, "must not be negative"));
        }
        Ok(value)
    }
}

fn invalid(field: &str, reason: &str) -> RentalError {
    RentalError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

pub type BikeConstructor = fn(&BikeData) -> Result<Bike>;

#[derive(Clone)]
pub struct BikeRegistry {
    constructors: HashMap<String, BikeConstructor>,
}

impl fmt::Debug for BikeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BikeRegistry")
            .field("type_tags", &self.type_tags())
            .finish()
    }
}

impl Default for BikeRegistry {
    fn default() -> Self {
        Self::with_builtin_types()
    }
}

impl BikeRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    // mountain, road and electric
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::empty();
        registry.register("mountain", build_mountain);
        registry.register("road", build_road);
        registry.register("electric", build_electric);
        registry
    }

    // Registers `constructor` under `type_tag`, returning the constructor it
    // replaced, if any.
    pub fn register(
        &mut self,
        type_tag: impl Into<String>,
        constructor: BikeConstructor,
    ) -> Option<BikeConstructor> {
        self.constructors.insert(type_tag.into(), constructor)
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.constructors.contains_key(type_tag)
    }

    pub fn type_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn build(&self, type_tag: &str, data: &BikeData) -> Result<Bike> {
        let constructor = self
            .constructors
            .get(type_tag)
            .ok_or_else(|| RentalError::UnknownType(type_tag.to_string()))?;

        constructor(data)
    }
}

fn build_mountain(data: &BikeData) -> Result<Bike> {
    let model = data.required_str(MODEL_FIELD)?;
    let price = data.required_non_negative(PRICE_FIELD)?;
    Ok(Bike::new(model, price, Arc::new(MountainBike)))
}

fn build_road(data: &BikeData) -> Result<Bike> {
    let model = data.required_str(MODEL_FIELD)?;
    let price = data.required_non_negative(PRICE_FIELD)?;
    Ok(Bike::new(model, price, Arc::new(RoadBike)))
}

fn build_electric(data: &BikeData) -> Result<Bike> {
    let model = data.required_str(MODEL_FIELD)?;
    let price = data.required_non_negative(PRICE_FIELD)?;
    let battery_capacity_wh = data.required_non_negative(BATTERY_FIELD)?;
    Ok(Bike::new(
        model,
        price,
        Arc::new(ElectricBike { battery_capacity_wh }),
    ))
}
