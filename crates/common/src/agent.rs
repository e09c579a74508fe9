//! Agent tool descriptors and their serialization.
//!
//! `ToolSpec` travels in two forms: a positional binary wire form between
//! nodes (version-gated, see `wire`) and a JSON document form for
//! persistence and the REST surface. The wire form is not self-describing;
//! both endpoints must agree on the protocol version.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::utils::strings;
use crate::wire::{ProtocolVersion, WireReader, WireWriter};

/// String-keyed parameter map; a `None` value is an explicitly-null entry.
pub type ParameterMap = BTreeMap<String, Option<String>>;

/// Descriptor for a tool an ML agent may invoke.
///
/// Immutable after construction; build one with [`ToolSpec::builder`] or
/// by decoding. Equality and hashing are structural over all six fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    tool_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "map_is_none_or_empty",
        deserialize_with = "de_parameter_map"
    )]
    parameters: Option<ParameterMap>,
    #[serde(default)]
    include_output_in_agent_response: bool,
    #[serde(
        rename = "config",
        default,
        skip_serializing_if = "map_is_none_or_empty",
        deserialize_with = "de_parameter_map"
    )]
    config_map: Option<ParameterMap>,
}

fn map_is_none_or_empty(map: &Option<ParameterMap>) -> bool {
    map.as_ref().map_or(true, |m| m.is_empty())
}

/// Documents may carry mixed scalar types in their parameter objects;
/// normalize everything to string values on the way in.
fn de_parameter_map<'de, D>(deserializer: D) -> std::result::Result<Option<ParameterMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let object = Option::<Map<String, Value>>::deserialize(deserializer)?;
    Ok(object.map(|o| strings::parameter_map(&o)))
}

impl ToolSpec {
    /// First protocol version that carries the `config` field on the wire.
    /// Writers below this version silently drop it for older readers.
    pub const MIN_VERSION_FOR_TOOL_CONFIG: ProtocolVersion = ProtocolVersion::V_2_18_0;

    pub fn builder() -> ToolSpecBuilder {
        ToolSpecBuilder::default()
    }

    pub fn tool_type(&self) -> &str {
        &self.tool_type
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameters(&self) -> Option<&ParameterMap> {
        self.parameters.as_ref()
    }

    pub fn include_output_in_agent_response(&self) -> bool {
        self.include_output_in_agent_response
    }

    pub fn config_map(&self) -> Option<&ParameterMap> {
        self.config_map.as_ref()
    }

    /// Write the binary wire form at the writer's negotiated version.
    ///
    /// An absent or empty `parameters` map is written as a single absent
    /// flag; `config_map` keeps the absent/empty distinction but is only
    /// written at all from `MIN_VERSION_FOR_TOOL_CONFIG` on.
    pub fn write_to(&self, out: &mut WireWriter) {
        out.write_str(&self.tool_type);
        out.write_optional_str(self.name.as_deref());
        out.write_optional_str(self.description.as_deref());
        match &self.parameters {
            Some(map) if !map.is_empty() => {
                out.write_bool(true);
                out.write_str_map(map);
            }
            _ => out.write_bool(false),
        }
        out.write_bool(self.include_output_in_agent_response);
        if out.version().on_or_after(Self::MIN_VERSION_FOR_TOOL_CONFIG) {
            match &self.config_map {
                Some(map) => {
                    out.write_bool(true);
                    out.write_str_map(map);
                }
                None => out.write_bool(false),
            }
        }
    }

    /// Read the binary wire form at the reader's negotiated version.
    /// Below the config gate no config section is consumed and
    /// `config_map` stays unset.
    pub fn read_from(input: &mut WireReader<'_>) -> Result<Self> {
        let tool_type = input.read_str()?;
        let name = input.read_optional_str()?;
        let description = input.read_optional_str()?;
        let parameters = if input.read_bool()? {
            Some(input.read_str_map()?)
        } else {
            None
        };
        let include_output_in_agent_response = input.read_bool()?;
        let config_map = if input.version().on_or_after(Self::MIN_VERSION_FOR_TOOL_CONFIG)
            && input.read_bool()?
        {
            Some(input.read_str_map()?)
        } else {
            None
        };

        Ok(Self {
            tool_type,
            name,
            description,
            parameters,
            include_output_in_agent_response,
            config_map,
        })
    }

    /// Encode to the binary wire form at `version`.
    pub fn to_bytes(&self, version: ProtocolVersion) -> Bytes {
        let mut writer = WireWriter::new(version);
        self.write_to(&mut writer);
        writer.finish()
    }

    /// Decode the binary wire form at `version`. Trailing bytes are left
    /// for the caller; a mixed-version pair legitimately leaves the
    /// unread config section behind.
    pub fn from_bytes(bytes: &[u8], version: ProtocolVersion) -> Result<Self> {
        let mut reader = WireReader::new(bytes, version);
        Self::read_from(&mut reader)
    }

    /// Encode to the JSON document form. Absent fields are omitted, as
    /// are empty parameter and config maps; the include-output flag is
    /// always present.
    pub fn to_document(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a JSON document value. Unknown fields are ignored so
    /// documents written by newer schema versions still decode. Fails
    /// with `MalformedInput` when the document is not an object or lacks
    /// `type`.
    pub fn from_document(document: Value) -> Result<Self> {
        Ok(serde_json::from_value(document)?)
    }

    /// Decode from JSON text. Same tolerances as [`ToolSpec::from_document`].
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for [`ToolSpec`]. `build` fails unless a tool type was set.
#[derive(Debug, Default)]
pub struct ToolSpecBuilder {
    tool_type: Option<String>,
    name: Option<String>,
    description: Option<String>,
    parameters: Option<ParameterMap>,
    include_output_in_agent_response: bool,
    config_map: Option<ParameterMap>,
}

impl ToolSpecBuilder {
    pub fn tool_type(mut self, tool_type: impl Into<String>) -> Self {
        self.tool_type = Some(tool_type.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameters(mut self, parameters: ParameterMap) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn include_output_in_agent_response(mut self, include: bool) -> Self {
        self.include_output_in_agent_response = include;
        self
    }

    pub fn config_map(mut self, config_map: ParameterMap) -> Self {
        self.config_map = Some(config_map);
        self
    }

    pub fn build(self) -> Result<ToolSpec> {
        let tool_type = self
            .tool_type
            .ok_or_else(|| Error::InvalidArgument("tool type is null".to_string()))?;

        Ok(ToolSpec {
            tool_type,
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            include_output_in_agent_response: self.include_output_in_agent_response,
            config_map: self.config_map,
        })
    }
}
