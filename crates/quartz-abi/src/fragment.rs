//! ABI fragments
//!
//! A fragment is one entry of a contract's JSON ABI: a function, event,
//! constructor, or the fallback/receive markers. Only the fields the codec
//! needs are modeled; unknown JSON keys are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::error::AbiError;
use crate::param::Param;
use crate::parser::parse_param;

/// Fragment discriminator, matching the JSON `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentKind {
    /// Callable function
    Function,
    /// Log event
    Event,
    /// Contract constructor
    Constructor,
    /// Fallback handler
    Fallback,
    /// Plain-ether receive handler
    Receive,
}

/// One entry of a contract ABI.
#[derive(Debug, Clone, Deserialize)]
pub struct Fragment {
    /// Fragment kind (the JSON `type` field)
    #[serde(rename = "type")]
    pub kind: FragmentKind,
    /// Function or event name; absent for constructor/fallback/receive
    #[serde(default)]
    pub name: Option<String>,
    /// Input parameter descriptions, kept as raw JSON until parsed
    #[serde(default)]
    pub inputs: Vec<Value>,
    /// Output parameter descriptions
    #[serde(default)]
    pub outputs: Vec<Value>,
    /// State mutability marker (`view`, `pure`, `payable`, `nonpayable`)
    #[serde(rename = "stateMutability", default)]
    pub state_mutability: Option<String>,
    /// True for anonymous events, which carry no signature topic
    #[serde(default)]
    pub anonymous: bool,
}

impl Fragment {
    /// Parse a fragment from its JSON representation.
    pub fn from_json(value: &Value) -> Result<Self, AbiError> {
        serde_json::from_value(value.clone())
            .map_err(|e| AbiError::InvalidFragment(e.to_string()))
    }

    /// Parse the input descriptions into type descriptors.
    pub fn input_params(&self) -> Result<Vec<Param>, AbiError> {
        self.inputs
            .iter()
            .map(|v| parse_param(v).map_err(AbiError::from))
            .collect()
    }

    /// Canonical signature, `name(type1,type2,...)` with tuples fully
    /// expanded. Only named functions and events have one.
    pub fn canonical_signature(&self) -> Result<String, AbiError> {
        if !matches!(self.kind, FragmentKind::Function | FragmentKind::Event) {
            return Err(AbiError::InvalidFragment(
                "only functions and events have a signature".to_string(),
            ));
        }
        let name = self.name.as_deref().filter(|n| !n.is_empty()).ok_or_else(|| {
            AbiError::InvalidFragment("fragment has no name".to_string())
        })?;
        let params = self.input_params()?;
        let types: Vec<String> = params.iter().map(|p| p.kind.to_string()).collect();
        Ok(format!("{}({})", name, types.join(",")))
    }
}
