//! Data-described response schemas.
//!
//! A [`Schema`] is sent to the backend as the `responseSchema` of a
//! structured request, and the same value checks the parsed reply before any
//! of it is trusted.

use serde_json::{json, Map, Value};

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String {
        description: Option<&'static str>,
    },
    Number {
        description: Option<&'static str>,
    },
    Array {
        description: Option<&'static str>,
        items: Box<Schema>,
    },
    Object {
        description: Option<&'static str>,
        properties: Vec<(&'static str, Schema)>,
        required: Vec<&'static str>,
    },
}

impl Schema {
    pub fn string() -> Self {
        Schema::String { description: None }
    }

    pub fn number() -> Self {
        Schema::Number { description: None }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            description: None,
            items: Box::new(items),
        }
    }

    pub fn object(properties: Vec<(&'static str, Schema)>, required: Vec<&'static str>) -> Self {
        Schema::Object {
            description: None,
            properties,
            required,
        }
    }

    pub fn describe(mut self, text: &'static str) -> Self {
        match &mut self {
            Schema::String { description }
            | Schema::Number { description }
            | Schema::Array { description, .. }
            | Schema::Object { description, .. } => *description = Some(text),
        }
        self
    }

    fn type_name(&self) -> &'static str {
        match self {
            Schema::String { .. } => "STRING",
            Schema::Number { .. } => "NUMBER",
            Schema::Array { .. } => "ARRAY",
            Schema::Object { .. } => "OBJECT",
        }
    }

    /// Wire form understood by the Gemini `responseSchema` field
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(self.type_name()));

        match self {
            Schema::String { description } | Schema::Number { description } => {
                if let Some(text) = description {
                    out.insert("description".to_string(), json!(text));
                }
            }
            Schema::Array { description, items } => {
                if let Some(text) = description {
                    out.insert("description".to_string(), json!(text));
                }
                out.insert("items".to_string(), items.to_json());
            }
            Schema::Object {
                description,
                properties,
                required,
            } => {
                if let Some(text) = description {
                    out.insert("description".to_string(), json!(text));
                }
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, schema)| (name.to_string(), schema.to_json()))
                    .collect();
                out.insert("properties".to_string(), Value::Object(props));
                out.insert("required".to_string(), json!(required));
            }
        }

        Value::Object(out)
    }

    /// Checks `value` against this schema
    ///
    /// Properties not declared in the schema are allowed. Declared but
    /// optional properties may be absent, but must match when present.
    pub fn validate(&self, value: &Value) -> Result<(), ParseError> {
        self.validate_at(value, "$")
    }

    fn validate_at(&self, value: &Value, path: &str) -> Result<(), ParseError> {
        let mismatch = |expected: &str| ParseError::Schema {
            path: path.to_string(),
            expected: expected.to_string(),
        };

        match self {
            Schema::String { .. } => value.as_str().map(|_| ()).ok_or_else(|| mismatch("string")),
            Schema::Number { .. } => value.as_f64().map(|_| ()).ok_or_else(|| mismatch("number")),
            Schema::Array { items, .. } => {
                let elements = value.as_array().ok_or_else(|| mismatch("array"))?;
                for (index, element) in elements.iter().enumerate() {
                    items.validate_at(element, &format!("{}[{}]", path, index))?;
                }
                Ok(())
            }
            Schema::Object {
                properties,
                required,
                ..
            } => {
                let fields = value.as_object().ok_or_else(|| mismatch("object"))?;
                for name in required {
                    if !fields.contains_key(*name) {
                        return Err(ParseError::Schema {
                            path: child_path(path, name),
                            expected: "required property".to_string(),
                        });
                    }
                }
                for (name, schema) in properties {
                    if let Some(field) = fields.get(*name) {
                        schema.validate_at(field, &child_path(path, name))?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "$" {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Schema of the ingredient and recipe extraction response
pub fn recipe_schema() -> Schema {
    let recipe = Schema::object(
        vec![
            ("title", Schema::string().describe("The name of the recipe.")),
            (
                "prepTime",
                Schema::number().describe("Estimated preparation and cooking time in minutes."),
            ),
            (
                "difficulty",
                Schema::string().describe("Difficulty level: 'Easy', 'Medium', or 'Hard'."),
            ),
            (
                "ingredients",
                Schema::array(Schema::string())
                    .describe("A list of all ingredients needed for this recipe."),
            ),
            (
                "instructions",
                Schema::array(Schema::string()).describe("Step-by-step cooking instructions."),
            ),
            (
                "dietaryTags",
                Schema::array(Schema::string())
                    .describe("Tags like 'Vegetarian', 'Vegan', 'Gluten-Free', 'Quick Meals'."),
            ),
        ],
        vec![
            "title",
            "prepTime",
            "difficulty",
            "ingredients",
            "instructions",
            "dietaryTags",
        ],
    );

    Schema::object(
        vec![
            (
                "ingredients",
                Schema::array(Schema::string())
                    .describe("A list of 2-4 key ingredients identified from the image(s)."),
            ),
            (
                "recipes",
                Schema::array(recipe)
                    .describe("A list of 3-4 recipe suggestions based on the ingredients."),
            ),
        ],
        vec!["ingredients", "recipes"],
    )
}
