//! Splicing compiled scenes into shader templates

use crate::error::{CompileError, Result};

/// Line marker replaced by the compiled scene
pub const SCENE_MARKER: &str = "// SDF_SCENE_PLACEHOLDER";

/// Replace the marker line of `template` with `fragment`.
///
/// The marker must be alone on its line. Each fragment line is indented like
/// the marker. Only the first marker is replaced; a template without one is
/// an error.
pub fn splice_into_template(template: &str, fragment: &str) -> Result<String> {
    let mut result = String::with_capacity(template.len() + fragment.len());
    let mut spliced = false;

    for line in template.split_inclusive('\n') {
        let body = line.trim_start();
        if spliced || body.trim_end() != SCENE_MARKER {
            result.push_str(line);
            continue;
        }

        let indent = &line[..line.len() - body.len()];
        for fragment_line in fragment.lines() {
            if !fragment_line.is_empty() {
                result.push_str(indent);
                result.push_str(fragment_line);
            }
            result.push('\n');
        }
        spliced = true;
    }

    if !spliced {
        return Err(CompileError::Template(format!(
            "no `{}` line found",
            SCENE_MARKER
        )));
    }
    Ok(result)
}
