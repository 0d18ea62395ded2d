//! Deterministic data manipulation tools.
//!
//! These run without any LLM call and are the cheap glue between nodes:
//! re-mapping fields, filtering arrays, merging objects.

use async_trait::async_trait;
use serde_json::{Map, Value};

use toolflow_types::error::EngineError;
use toolflow_types::tool::{Parameter, ParameterType, ToolDefinition};

use crate::tool::{Tool, ToolContext, ToolOutput};
use crate::workflow::mapping::get_by_path;

fn def(
    tool_id: &str,
    name: &str,
    description: &str,
    input_schema: Vec<Parameter>,
    output_schema: Vec<Parameter>,
) -> ToolDefinition {
    ToolDefinition {
        tool_id: tool_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        version: "1.0.0".to_string(),
        category: "data".to_string(),
        input_schema,
        output_schema,
        has_prompt: false,
    }
}

// ---------------------------------------------------------------------------
// data.map
// ---------------------------------------------------------------------------

/// Re-maps an object's fields: `mapping` is `newKey -> dot.path` into `data`.
/// Unresolvable paths produce `null` for their key.
pub struct DataMapTool {
    definition: ToolDefinition,
}

impl DataMapTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "data.map",
                "Data Mapper",
                "Re-maps object fields via dot-paths",
                vec![
                    Parameter::required("data", ParameterType::Object, "Input object"),
                    Parameter::required("mapping", ParameterType::Object, "newKey -> source dot-path"),
                ],
                vec![Parameter::required("result", ParameterType::Object, "Re-mapped object")],
            ),
        }
    }
}

impl Default for DataMapTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DataMapTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let data = inputs.get("data").cloned().unwrap_or(Value::Null);
        let mapping = inputs
            .get("mapping")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let mut result = Map::new();
        for (new_key, path) in &mapping {
            let path = path.as_str().unwrap_or_default();
            let value = get_by_path(&data, path).unwrap_or(Value::Null);
            result.insert(new_key.clone(), value);
        }

        let mut out = Map::new();
        out.insert("result".to_string(), Value::Object(result));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// data.filter
// ---------------------------------------------------------------------------

/// Filters an array by comparing a field (dot-path) of each item against a
/// value with one of: eq, ne, gt, gte, lt, lte, contains, exists.
pub struct DataFilterTool {
    definition: ToolDefinition,
}

impl DataFilterTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "data.filter",
                "Data Filter",
                "Filters an array by a field condition",
                vec![
                    Parameter::required("items", ParameterType::Array, "Array to filter"),
                    Parameter::required("field", ParameterType::String, "Field dot-path to compare"),
                    Parameter::optional(
                        "operator",
                        ParameterType::String,
                        "eq, ne, gt, gte, lt, lte, contains, exists",
                        Some(Value::String("eq".to_string())),
                    ),
                    Parameter::optional("value", ParameterType::Any, "Comparison value", None),
                ],
                vec![
                    Parameter::required("filtered", ParameterType::Array, "Items that matched"),
                    Parameter::required("count", ParameterType::Integer, "Number of matches"),
                ],
            ),
        }
    }
}

impl Default for DataFilterTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DataFilterTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let items = inputs
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let field = inputs
            .get("field")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let operator = inputs
            .get("operator")
            .and_then(Value::as_str)
            .unwrap_or("eq");
        let value = inputs.get("value").cloned().unwrap_or(Value::Null);

        let filtered: Vec<Value> = items
            .into_iter()
            .filter(|item| {
                let item_value = get_by_path(item, field).unwrap_or(Value::Null);
                compare(&item_value, operator, &value)
            })
            .collect();

        let mut out = Map::new();
        out.insert("count".to_string(), Value::from(filtered.len()));
        out.insert("filtered".to_string(), Value::Array(filtered));
        Ok(ToolOutput::of(out))
    }
}

/// An unrecognized operator, or an impossible comparison (e.g. ordering a
/// string against an object), is simply false.
fn compare(item_value: &Value, operator: &str, value: &Value) -> bool {
    match operator {
        "exists" => !item_value.is_null(),
        "eq" => item_value == value,
        "ne" => item_value != value,
        "gt" | "gte" | "lt" | "lte" => match order(item_value, value) {
            Some(ord) => match operator {
                "gt" => ord.is_gt(),
                "gte" => ord.is_ge(),
                "lt" => ord.is_lt(),
                _ => ord.is_le(),
            },
            None => false,
        },
        "contains" => match value.as_str() {
            Some(needle) => stringify(item_value).contains(needle),
            None => false,
        },
        _ => false,
    }
}

fn order(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
        return x.partial_cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Some(x.cmp(y));
    }
    None
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// data.merge
// ---------------------------------------------------------------------------

/// Merges an array of objects into one, shallow or deep. Non-object entries
/// are ignored.
pub struct DataMergeTool {
    definition: ToolDefinition,
}

impl DataMergeTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "data.merge",
                "Data Merger",
                "Merges multiple objects into one",
                vec![
                    Parameter::required("objects", ParameterType::Array, "Objects to merge"),
                    Parameter::optional(
                        "strategy",
                        ParameterType::String,
                        "'shallow' or 'deep'",
                        Some(Value::String("shallow".to_string())),
                    ),
                ],
                vec![Parameter::required("merged", ParameterType::Object, "Merged object")],
            ),
        }
    }
}

impl Default for DataMergeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DataMergeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let objects = inputs
            .get("objects")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let deep = inputs.get("strategy").and_then(Value::as_str) == Some("deep");

        let mut merged = Map::new();
        for obj in objects {
            if let Value::Object(obj) = obj {
                if deep {
                    deep_merge(&mut merged, obj);
                } else {
                    merged.extend(obj);
                }
            }
        }

        let mut out = Map::new();
        out.insert("merged".to_string(), Value::Object(merged));
        Ok(ToolOutput::of(out))
    }
}

fn deep_merge(base: &mut Map<String, Value>, update: Map<String, Value>) {
    for (key, value) in update {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// data.select
// ---------------------------------------------------------------------------

/// Picks a subset of fields from an object. Each field is a dot-path; the
/// last path segment becomes the output key. Unresolvable fields are
/// omitted.
pub struct DataSelectTool {
    definition: ToolDefinition,
}

impl DataSelectTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "data.select",
                "Data Selector",
                "Selects specific fields from an object",
                vec![
                    Parameter::required("data", ParameterType::Object, "Input object"),
                    Parameter::required("fields", ParameterType::Array, "Field dot-paths to keep"),
                ],
                vec![Parameter::required("selected", ParameterType::Object, "Selected fields")],
            ),
        }
    }
}

impl Default for DataSelectTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DataSelectTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let data = inputs.get("data").cloned().unwrap_or(Value::Null);
        let fields = inputs
            .get("fields")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut selected = Map::new();
        for field in &fields {
            let Some(path) = field.as_str() else { continue };
            match get_by_path(&data, path) {
                Some(value) if !value.is_null() => {
                    let key = path.rsplit('.').next().unwrap_or(path);
                    selected.insert(key.to_string(), value);
                }
                _ => {}
            }
        }

        let mut out = Map::new();
        out.insert("selected".to_string(), Value::Object(selected));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// data.transform
// ---------------------------------------------------------------------------

/// Applies a field re-mapping to every item of an array.
pub struct DataTransformTool {
    definition: ToolDefinition,
}

impl DataTransformTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "data.transform",
                "Data Transformer",
                "Re-maps every item of an array",
                vec![
                    Parameter::required("items", ParameterType::Array, "Array to transform"),
                    Parameter::required("mapping", ParameterType::Object, "newKey -> source dot-path"),
                ],
                vec![Parameter::required("transformed", ParameterType::Array, "Re-mapped items")],
            ),
        }
    }
}

impl Default for DataTransformTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DataTransformTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let items = inputs
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mapping = inputs
            .get("mapping")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let transformed: Vec<Value> = items
            .iter()
            .map(|item| {
                let mut new_item = Map::new();
                for (new_key, path) in &mapping {
                    let path = path.as_str().unwrap_or_default();
                    let value = get_by_path(item, path).unwrap_or(Value::Null);
                    new_item.insert(new_key.clone(), value);
                }
                Value::Object(new_item)
            })
            .collect();

        let mut out = Map::new();
        out.insert("transformed".to_string(), Value::Array(transformed));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use toolflow_types::config::EngineConfig;
    use uuid::Uuid;

    fn ctx() -> ToolContext {
        ToolContext::new(Uuid::now_v7(), "n1", Arc::new(EngineConfig::default()))
    }

    fn inputs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_data_map() {
        let out = DataMapTool::new()
            .run(
                inputs(json!({
                    "data": {"user": {"name": "kim", "age": 30}},
                    "mapping": {"who": "user.name", "missing": "user.email"}
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["result"]["who"], json!("kim"));
        assert_eq!(out.value["result"]["missing"], Value::Null);
    }

    #[tokio::test]
    async fn test_data_filter_operators() {
        let items = json!([
            {"name": "a", "score": 10},
            {"name": "b", "score": 25},
            {"name": "c"}
        ]);

        let out = DataFilterTool::new()
            .run(
                inputs(json!({"items": items, "field": "score", "operator": "gte", "value": 20})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["count"], json!(1));
        assert_eq!(out.value["filtered"][0]["name"], json!("b"));

        let out = DataFilterTool::new()
            .run(
                inputs(json!({"items": items, "field": "score", "operator": "exists"})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["count"], json!(2));
    }

    #[tokio::test]
    async fn test_data_filter_contains() {
        let items = json!([{"tag": "alpha-one"}, {"tag": "beta"}]);
        let out = DataFilterTool::new()
            .run(
                inputs(json!({
                    "items": items,
                    "field": "tag",
                    "operator": "contains",
                    "value": "alpha"
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["count"], json!(1));
    }

    #[tokio::test]
    async fn test_data_filter_unknown_operator_matches_nothing() {
        let items = json!([{"x": 1}]);
        let out = DataFilterTool::new()
            .run(
                inputs(json!({"items": items, "field": "x", "operator": "like", "value": 1})),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["count"], json!(0));
    }

    #[tokio::test]
    async fn test_data_merge_shallow_last_wins() {
        let out = DataMergeTool::new()
            .run(
                inputs(json!({
                    "objects": [{"a": 1, "nested": {"x": 1}}, {"a": 2, "nested": {"y": 2}}]
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["merged"]["a"], json!(2));
        // Shallow: the second nested object replaces the first wholesale.
        assert_eq!(out.value["merged"]["nested"], json!({"y": 2}));
    }

    #[tokio::test]
    async fn test_data_merge_deep() {
        let out = DataMergeTool::new()
            .run(
                inputs(json!({
                    "objects": [{"nested": {"x": 1}}, {"nested": {"y": 2}}],
                    "strategy": "deep"
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["merged"]["nested"], json!({"x": 1, "y": 2}));
    }

    #[tokio::test]
    async fn test_data_select_uses_last_segment() {
        let out = DataSelectTool::new()
            .run(
                inputs(json!({
                    "data": {"user": {"name": "kim"}, "extra": 1},
                    "fields": ["user.name", "missing.path"]
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(out.value["selected"], json!({"name": "kim"}));
    }

    #[tokio::test]
    async fn test_data_transform() {
        let out = DataTransformTool::new()
            .run(
                inputs(json!({
                    "items": [{"user": {"name": "a"}}, {"user": {"name": "b"}}],
                    "mapping": {"name": "user.name"}
                })),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(
            out.value["transformed"],
            json!([{"name": "a"}, {"name": "b"}])
        );
    }

    #[tokio::test]
    async fn test_missing_required_input_rejected() {
        let err = DataMapTool::new()
            .run(inputs(json!({"data": {}})), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.code, toolflow_types::error::ErrorCode::ToolInputInvalid);
    }
}
