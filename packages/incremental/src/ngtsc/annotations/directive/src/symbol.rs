// Directive Symbol
//
// Represents an Angular directive for semantic graph tracking.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ngtsc::incremental::semantic_graph::src::api::SymbolKey;
use crate::ngtsc::reflection::DirectiveMeta;

/// Type parameters for a directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticTypeParameter {
    pub name: String,
    pub constraint: Option<String>,
}

/// Input or output mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputOrOutput {
    /// The class property name.
    pub class_property_name: String,
    /// The binding property name (template name).
    pub binding_property_name: String,
    /// Whether this is a signal-based input/output.
    #[serde(default)]
    pub is_signal: bool,
}

impl InputOrOutput {
    pub fn new(binding: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            class_property_name: property.into(),
            binding_property_name: binding.into(),
            is_signal: false,
        }
    }
}

/// Input mapping with additional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMappingMeta {
    /// Base input/output info.
    pub base: InputOrOutput,
    /// Whether this input is required.
    #[serde(default)]
    pub required: bool,
}

impl InputMappingMeta {
    pub fn new(binding: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            base: InputOrOutput::new(binding, property),
            required: false,
        }
    }
}

/// Template guard metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGuardMeta {
    pub input_name: String,
    pub guard_type: TemplateGuardType,
}

/// Type of template guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateGuardType {
    Binding,
    Invocation,
}

/// Type check metadata for a directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectiveTypeCheckMeta {
    /// Whether the directive has ngTemplateContextGuard.
    pub has_ng_template_context_guard: bool,
    /// Template guards for inputs.
    pub ng_template_guards: Vec<TemplateGuardMeta>,
    /// Whether the directive is generic.
    pub is_generic: bool,
    /// Coerced input fields.
    pub coerced_input_fields: BTreeSet<String>,
    /// Restricted input fields.
    pub restricted_input_fields: BTreeSet<String>,
    /// String literal input fields.
    pub string_literal_input_fields: BTreeSet<String>,
    /// Undeclared input fields.
    pub undeclared_input_fields: BTreeSet<String>,
}

/// Represents an Angular directive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveSymbol {
    /// The directive selector.
    pub selector: Option<String>,
    /// Input mappings.
    pub inputs: Vec<InputMappingMeta>,
    /// Output mappings.
    pub outputs: Vec<InputOrOutput>,
    /// Export as names.
    pub export_as: Option<Vec<String>>,
    /// Type check metadata.
    pub type_check_meta: DirectiveTypeCheckMeta,
    /// Type parameters.
    pub type_parameters: Option<Vec<SemanticTypeParameter>>,
    /// Base class, if any.
    pub base_class: Option<SymbolKey>,
}

impl DirectiveSymbol {
    pub fn new(selector: Option<String>) -> Self {
        Self {
            selector,
            inputs: Vec::new(),
            outputs: Vec::new(),
            export_as: None,
            type_check_meta: DirectiveTypeCheckMeta::default(),
            type_parameters: None,
            base_class: None,
        }
    }

    pub fn from_meta(meta: &DirectiveMeta) -> Self {
        Self {
            selector: meta.selector.clone(),
            inputs: meta.inputs.clone(),
            outputs: meta.outputs.clone(),
            export_as: meta.export_as.clone(),
            type_check_meta: meta.type_check_meta.clone(),
            type_parameters: meta.type_parameters.clone(),
            base_class: meta.base_class.clone(),
        }
    }

    pub fn with_inputs(mut self, inputs: Vec<InputMappingMeta>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<InputOrOutput>) -> Self {
        self.outputs = outputs;
        self
    }

    pub fn with_export_as(mut self, export_as: Vec<String>) -> Self {
        self.export_as = Some(export_as);
        self
    }

    /// Check if the public API is affected compared to a previous symbol.
    ///
    /// The public API consists of the selector, the input and output binding
    /// pairs (compared as sets, so declaration order is irrelevant) and the
    /// `exportAs` names.
    pub fn is_public_api_affected(&self, previous: &DirectiveSymbol) -> bool {
        if self.selector != previous.selector {
            return true;
        }

        if input_bindings(&self.inputs) != input_bindings(&previous.inputs) {
            return true;
        }

        if output_bindings(&self.outputs) != output_bindings(&previous.outputs) {
            return true;
        }

        export_as_set(&self.export_as) != export_as_set(&previous.export_as)
    }

    /// Check if the type check API is affected compared to a previous symbol.
    pub fn is_type_check_api_affected(&self, previous: &DirectiveSymbol) -> bool {
        if self.is_public_api_affected(previous) {
            return true;
        }

        if input_details(&self.inputs) != input_details(&previous.inputs)
            || output_details(&self.outputs) != output_details(&previous.outputs)
        {
            return true;
        }

        if self.type_parameters != previous.type_parameters {
            return true;
        }

        if !self.is_type_check_meta_equal(&previous.type_check_meta) {
            return true;
        }

        self.base_class != previous.base_class
    }

    fn is_type_check_meta_equal(&self, other: &DirectiveTypeCheckMeta) -> bool {
        let meta = &self.type_check_meta;

        meta.has_ng_template_context_guard == other.has_ng_template_context_guard
            && meta.is_generic == other.is_generic
            && meta.ng_template_guards == other.ng_template_guards
            && meta.coerced_input_fields == other.coerced_input_fields
            && meta.restricted_input_fields == other.restricted_input_fields
            && meta.string_literal_input_fields == other.string_literal_input_fields
            && meta.undeclared_input_fields == other.undeclared_input_fields
    }
}

fn input_bindings(inputs: &[InputMappingMeta]) -> BTreeMap<&str, &str> {
    inputs
        .iter()
        .map(|i| (i.base.binding_property_name.as_str(), i.base.class_property_name.as_str()))
        .collect()
}

fn output_bindings(outputs: &[InputOrOutput]) -> BTreeMap<&str, &str> {
    outputs
        .iter()
        .map(|o| (o.binding_property_name.as_str(), o.class_property_name.as_str()))
        .collect()
}

fn input_details(inputs: &[InputMappingMeta]) -> BTreeSet<(&str, bool, bool)> {
    inputs
        .iter()
        .map(|i| (i.base.binding_property_name.as_str(), i.base.is_signal, i.required))
        .collect()
}

fn output_details(outputs: &[InputOrOutput]) -> BTreeSet<(&str, bool)> {
    outputs
        .iter()
        .map(|o| (o.binding_property_name.as_str(), o.is_signal))
        .collect()
}

fn export_as_set(export_as: &Option<Vec<String>>) -> BTreeSet<&str> {
    export_as
        .iter()
        .flatten()
        .map(String::as_str)
        .collect()
}
