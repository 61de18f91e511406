//! Variables: local and published reads, bulk changes.
//!
//! `POST /v1/files/:key/variables` takes lists of changes tagged by an
//! `action` of `CREATE`, `UPDATE`, or `DELETE`. The change enums below carry
//! that tag so each variant only admits the fields its action requires.

use fetchkit_lib::{Endpoint, EndpointBuilder, RestMethod};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Declared, call, with_body};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum VariableCollectionChange {
    Create {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_mode_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hidden_from_publishing: Option<bool>,
    },
    Update {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        initial_mode_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hidden_from_publishing: Option<bool>,
    },
    Delete {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        initial_mode_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        hidden_from_publishing: Option<bool>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum VariableModeChange {
    Create {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        variable_collection_id: String,
    },
    Update {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        variable_collection_id: String,
    },
    Delete {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        variable_collection_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VariableResolvedType {
    Boolean,
    Float,
    String,
    Color,
}

/// Where a variable may be applied in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableScope {
    AllScopes,
    AllFills,
    TextContent,
    WidthHeight,
    Gap,
    StrokeFloat,
    Opacity,
    EffectFloat,
    FrameFill,
    ShapeFill,
    TextFill,
    StrokeColor,
    EffectColor,
}

/// Per-platform code names for a variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSyntax {
    #[serde(rename = "WEB")]
    pub web: String,
    #[serde(rename = "ANDROID")]
    pub android: String,
    #[serde(rename = "iOS")]
    pub ios: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "UPPERCASE", rename_all_fields = "camelCase")]
pub enum VariableChange {
    Create {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        name: String,
        variable_collection_id: String,
        resolved_type: VariableResolvedType,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hidden_from_publishing: Option<bool>,
        scopes: Vec<VariableScope>,
        code_syntax: CodeSyntax,
    },
    Update {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        variable_collection_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        resolved_type: Option<VariableResolvedType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        hidden_from_publishing: Option<bool>,
        scopes: Vec<VariableScope>,
        code_syntax: CodeSyntax,
    },
    Delete {
        id: String,
        scopes: Vec<VariableScope>,
        code_syntax: CodeSyntax,
    },
}

impl VariableChange {
    pub fn action(&self) -> ChangeAction {
        match self {
            Self::Create { .. } => ChangeAction::Create,
            Self::Update { .. } => ChangeAction::Update,
            Self::Delete { .. } => ChangeAction::Delete,
        }
    }
}

/// Sets a variable's value for one mode.
///
/// `value` is a string, number, boolean, color object, or variable alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableModeValue {
    pub variable_id: String,
    pub mode_id: String,
    pub value: Value,
}

/// Body of `POST /v1/files/:key/variables`. An empty request sends no body.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostVariablesRequest {
    #[serde(skip)]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_collections: Option<Vec<VariableCollectionChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_modes: Option<Vec<VariableModeChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<VariableChange>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_mode_values: Option<Vec<VariableModeValue>>,
}

impl PostVariablesRequest {
    fn is_empty(&self) -> bool {
        self.variable_collections.is_none()
            && self.variable_modes.is_none()
            && self.variables.is_none()
            && self.variable_mode_values.is_none()
    }
}

fn post_variables(req: PostVariablesRequest) -> Declared {
    let path = format!("/v1/files/{}/variables", req.key);
    let payload = (!req.is_empty()).then_some(&req);
    with_body(RestMethod::Post, path, payload)
}

#[derive(Debug, Clone)]
pub struct Variables {
    pub get_local_variables: Endpoint<String, Value>,
    pub get_published_variables: Endpoint<String, Value>,
    pub post_variables: Endpoint<PostVariablesRequest, Value>,
}

impl Variables {
    pub(crate) fn new(builder: &EndpointBuilder) -> Self {
        Self {
            get_local_variables: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/files/{key}/variables/local"))
            }),
            get_published_variables: builder.build(|key: String| {
                call(RestMethod::Get, format!("/v1/files/{key}/variables/published"))
            }),
            post_variables: builder.build(post_variables),
        }
    }
}
