//! Names used by the generated code
//!
//! The fragment is spliced into a shader the caller owns, so every name it
//! refers to outside of the operator table comes from here.

use serde::Deserialize;

/// Target environment description
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Target {
    /// Point variable in scope at the insertion site
    pub point: String,
    /// Material expression for shapes outside any material wrapper
    pub no_material: String,
    /// Type of each primitive binding and of the returned value
    pub result_type: String,
    /// Binding names are this prefix followed by the primitive index
    pub binding_prefix: String,
    /// Field read from a binding when it is referenced in the final expression
    pub binding_field: Option<String>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            point: "p".to_string(),
            no_material: "MAKE_NO_MAT()".to_string(),
            result_type: "sdf_result_t".to_string(),
            binding_prefix: "p".to_string(),
            binding_field: None,
        }
    }
}

impl Target {
    /// Name of the binding declared for primitive `index`
    pub fn binding_name(&self, index: usize) -> String {
        format!("{}{}", self.binding_prefix, index)
    }

    /// How the final expression refers to primitive `index`
    pub fn binding_ref(&self, index: usize) -> String {
        match &self.binding_field {
            Some(field) => format!("{}{}.{}", self.binding_prefix, index, field),
            None => self.binding_name(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let target = Target::default();
        assert_eq!(target.binding_name(3), "p3");
        assert_eq!(target.binding_ref(3), "p3");
    }

    #[test]
    fn test_binding_field() {
        let target = Target {
            binding_prefix: "prim".to_string(),
            binding_field: Some("dist_or_ref".to_string()),
            ..Target::default()
        };
        assert_eq!(target.binding_name(0), "prim0");
        assert_eq!(target.binding_ref(0), "prim0.dist_or_ref");
    }
}
