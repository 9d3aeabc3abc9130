//! Typed command parameters
//!
//! A command declares each parameter once with a name, a type and a default.
//! Caller-supplied values are bound by name; anything not supplied resolves
//! to its default, so no parameter is ever required.

use crate::error::{AutomationError, Result};

/// A parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    String(String),
    Integer(i64),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "string",
            ParamValue::Integer(_) => "integer",
        }
    }
}

#[derive(Debug, Clone)]
struct ParamDef {
    name: &'static str,
    default: ParamValue,
    value: Option<ParamValue>,
}

impl ParamDef {
    fn current(&self) -> &ParamValue {
        self.value.as_ref().unwrap_or(&self.default)
    }
}

/// Declared parameters of one command, with their bound values
#[derive(Debug, Clone)]
pub struct ParameterSet {
    command: &'static str,
    params: Vec<ParamDef>,
}

impl ParameterSet {
    pub fn new(command: &'static str) -> Self {
        Self {
            command,
            params: Vec::new(),
        }
    }

    /// Declare a string parameter.
    pub fn string(self, name: &'static str, default: &str) -> Self {
        self.define(name, ParamValue::String(default.to_string()))
    }

    /// Declare an integer parameter.
    pub fn integer(self, name: &'static str, default: i64) -> Self {
        self.define(name, ParamValue::Integer(default))
    }

    fn define(mut self, name: &'static str, default: ParamValue) -> Self {
        self.params.retain(|p| p.name != name);
        self.params.push(ParamDef {
            name,
            default,
            value: None,
        });
        self
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    /// Declared parameter names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|p| p.name)
    }

    /// Bind one caller-supplied value, parsed according to the declared type.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let command = self.command;
        let def = self
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| AutomationError::UnknownParameter {
                command: command.to_string(),
                name: name.to_string(),
            })?;

        let value = match def.default {
            ParamValue::String(_) => ParamValue::String(raw.to_string()),
            ParamValue::Integer(_) => {
                let parsed = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AutomationError::InvalidParameter {
                        name: name.to_string(),
                        reason: format!("expected an integer, got '{}'", raw),
                    })?;
                ParamValue::Integer(parsed)
            }
        };

        def.value = Some(value);
        Ok(())
    }

    /// Bind every supplied `(name, value)` pair, stopping at the first error.
    pub fn bind<I, K, V>(&mut self, supplied: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, raw) in supplied {
            self.set(name.as_ref(), raw.as_ref())?;
        }
        Ok(())
    }

    /// Whether a value was supplied for `name` (as opposed to the default).
    pub fn is_set(&self, name: &str) -> bool {
        self.params
            .iter()
            .any(|p| p.name == name && p.value.is_some())
    }

    /// Current value of `name`: the bound value or else the default.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.iter().find(|p| p.name == name).map(ParamDef::current)
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.lookup(name)? {
            ParamValue::String(s) => Ok(s.clone()),
            other => Err(self.type_mismatch(name, "string", other)),
        }
    }

    pub fn get_integer(&self, name: &str) -> Result<i64> {
        match self.lookup(name)? {
            ParamValue::Integer(i) => Ok(*i),
            other => Err(self.type_mismatch(name, "integer", other)),
        }
    }

    fn lookup(&self, name: &str) -> Result<&ParamValue> {
        self.get(name).ok_or_else(|| AutomationError::UnknownParameter {
            command: self.command.to_string(),
            name: name.to_string(),
        })
    }

    fn type_mismatch(&self, name: &str, wanted: &str, found: &ParamValue) -> AutomationError {
        AutomationError::InvalidParameter {
            name: name.to_string(),
            reason: format!("{} is declared as {}, not {}", name, found.type_name(), wanted),
        }
    }
}
