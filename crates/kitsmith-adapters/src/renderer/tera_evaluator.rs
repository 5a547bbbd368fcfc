//! Tera-backed phase-2 expression evaluator.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use kitsmith_core::{
    application::ports::{EvaluationError, ExpressionEvaluator},
    domain::{FunctionTable, FunctionValue, TemplateFunction},
};
use tera::{Context, Tera, Value};
use tracing::trace;

/// Evaluates template expressions with Tera and the kit function table.
///
/// Every table entry is callable as a function with named arguments
/// (`{{ upper(value=project_name) }}`). Entries whose first parameter is
/// `value` are also registered as filters (`{{ project_name | kebab }}`).
///
/// The engine is built once; `render_str` needs `&mut Tera`, hence the lock.
#[derive(Debug)]
pub struct TeraEvaluator {
    engine: Mutex<Tera>,
}

impl TeraEvaluator {
    pub fn new(functions: FunctionTable) -> Self {
        Self {
            engine: Mutex::new(build_engine(&functions)),
        }
    }
}

fn build_engine(functions: &FunctionTable) -> Tera {
    let mut engine = Tera::default();
    for function in functions.iter().copied() {
        engine.register_function(
            function.name,
            move |args: &HashMap<String, Value>| -> tera::Result<Value> {
                let values: Vec<String> = function
                    .params
                    .iter()
                    .map(|p| args.get(*p).map(value_to_string).unwrap_or_default())
                    .collect();
                Ok(call(&function, &values))
            },
        );

        // Tera resolves `default` itself and never consults a registered filter.
        if function.takes_value() && function.name != "default" {
            engine.register_filter(
                function.name,
                move |value: &Value, args: &HashMap<String, Value>| -> tera::Result<Value> {
                    let values: Vec<String> = std::iter::once(value_to_string(value))
                        .chain(
                            function.params[1..]
                                .iter()
                                .map(|p| args.get(*p).map(value_to_string).unwrap_or_default()),
                        )
                        .collect();
                    Ok(call(&function, &values))
                },
            );
        }
    }
    engine
}

impl Default for TeraEvaluator {
    fn default() -> Self {
        Self::new(FunctionTable::standard())
    }
}

impl ExpressionEvaluator for TeraEvaluator {
    fn evaluate(
        &self,
        content: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<String, EvaluationError> {
        let mut context = Context::new();
        for (name, value) in values {
            context.insert(name.as_str(), value);
        }

        let mut engine = self
            .engine
            .lock()
            .map_err(|_| EvaluationError::new("template engine lock poisoned"))?;
        engine.render_str(content, &context).map_err(|e| {
            trace!(error = ?e, "Tera render failed");
            EvaluationError::new(error_chain(&e))
        })
    }
}

fn call(function: &TemplateFunction, values: &[String]) -> Value {
    let args: Vec<&str> = values.iter().map(String::as_str).collect();
    match function.call(&args) {
        FunctionValue::Text(text) => Value::String(text),
        FunctionValue::Flag(flag) => Value::Bool(flag),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Tera nests the useful message in `source()`.
fn error_chain(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
