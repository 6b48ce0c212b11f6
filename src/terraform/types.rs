use serde_json::{Map, Value};

/// Everything `terraform output -json` prints, keyed by output name.
/// Keys keep the order the tool emitted them in.
pub type OutputSet = Map<String, Value>;

static NO_VALUE: Value = Value::Null;

/// The `value` of a named output.
///
/// Only `value` is read; `sensitive`, `type` and anything else next to it are
/// ignored whatever their shape. An output without a `value` yields `null`.
pub fn output_value<'a>(outputs: &'a OutputSet, name: &str) -> Option<&'a Value> {
    let raw = outputs.get(name)?;
    Some(raw.get("value").unwrap_or(&NO_VALUE))
}

/// Connection attributes published for a single VM.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VmRecord {
    pub ansible_host: Option<String>,
    pub ssh_user: Option<String>,
}

impl VmRecord {
    /// Fields with the wrong type are ignored rather than rejected.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(|s| s.to_string())
        };

        Self {
            ansible_host: field("ansible_host"),
            ssh_user: field("ssh_user"),
        }
    }
}
