#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_bind::fields::{BoundField, BoxFuture, CleanResult, Field, NumberField, StringField};
use oxide_bind::validators::{MaxLengthValidator, MinValidator};
use oxide_bind::{Form, FormData};
use serde_json::Value;
use tokio::sync::Barrier;

pub fn data(value: Value) -> FormData {
    value
        .as_object()
        .cloned()
        .unwrap_or_else(|| panic!("Expected an object, got {value}"))
}

/// `a`: text of at most 3 characters; `b`: number of at least 5.
pub fn two_field_form() -> Form {
    Form::builder()
        .field("a", StringField::new().validator(MaxLengthValidator::new(3)))
        .field("b", NumberField::new().validator(MinValidator::new(5)))
        .build()
}

/// A field whose clean waits on a shared barrier and records completion.
pub struct BarrierField {
    pub name: &'static str,
    pub barrier: Arc<Barrier>,
    pub finished: Arc<Mutex<Vec<&'static str>>>,
}

struct BoundBarrierField {
    name: &'static str,
    raw: Option<Value>,
    barrier: Arc<Barrier>,
    finished: Arc<Mutex<Vec<&'static str>>>,
}

impl Field for BarrierField {
    fn bind(&self, raw: Option<Value>) -> Box<dyn BoundField> {
        Box::new(BoundBarrierField {
            name: self.name,
            raw,
            barrier: Arc::clone(&self.barrier),
            finished: Arc::clone(&self.finished),
        })
    }
}

impl BoundField for BoundBarrierField {
    fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    fn clean(&self) -> BoxFuture<'_, CleanResult> {
        Box::pin(async move {
            self.barrier.wait().await;
            self.finished.lock().unwrap().push(self.name);
            Ok(self.raw.clone().unwrap_or(Value::Null))
        })
    }
}
