//! Export boundary: evaluate a document and mesh its visible outputs.

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use feature_engine::{evaluate, Document, DocumentState, EvaluationConfig};
use geom_kernel::{Kernel, RenderMesh};

use crate::errors::ExportError;

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Chordal tolerance for triangulating each output.
    pub tolerance: f64,
    pub evaluation: EvaluationConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Coarser meshes for previews.
    pub fn preview() -> Self {
        Self {
            tolerance: 0.1,
            ..Self::default()
        }
    }
}

/// One meshed visible object.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportItem {
    pub name: String,
    pub mesh: RenderMesh,
    pub color_rgb: [f64; 3],
}

/// Everything a writer needs to produce a multi-object mesh file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportManifest {
    /// Visible objects in stored order.
    pub items: Vec<ExportItem>,
    /// Objects that failed to evaluate or tessellate, hidden ones included.
    pub failures: Vec<ExportError>,
}

impl ExportManifest {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, name: &str) -> Option<&ExportItem> {
        self.items.iter().find(|item| item.name == name)
    }
}

/// Evaluate `doc` and triangulate each visible output.
#[instrument(skip_all, fields(objects = doc.len()))]
pub fn prepare_export(
    doc: &DocumentState,
    kernel: &mut dyn Kernel,
    config: &ExportConfig,
) -> ExportManifest {
    let evaluation = evaluate(doc, kernel, &config.evaluation);
    let mut manifest = ExportManifest {
        items: Vec::with_capacity(evaluation.manifest.len()),
        failures: evaluation
            .failures
            .into_iter()
            .map(ExportError::from)
            .collect(),
    };

    for output in evaluation.manifest {
        match kernel.triangulate(&output.shape, config.tolerance) {
            Ok(mesh) => manifest.items.push(ExportItem {
                name: output.name,
                mesh,
                color_rgb: output.color_rgb,
            }),
            Err(source) => {
                warn!(object = %output.name, error = %source, "tessellation failed");
                manifest.failures.push(ExportError::Tessellation {
                    name: output.name,
                    source,
                });
            }
        }
    }

    if manifest.is_empty() {
        warn!("no visible objects to export");
    }
    info!(
        items = manifest.items.len(),
        failed = manifest.failures.len(),
        "export prepared"
    );
    manifest
}

/// Per-object mesh summary stored under the object's name in `outputs`.
pub fn mesh_summary(item: &ExportItem) -> Value {
    let mut summary = json!({
        "vertices": item.mesh.vertex_count(),
        "triangles": item.mesh.triangle_count(),
        "color": item.color_rgb,
    });
    if let Some((min, max)) = item.mesh.bounds() {
        summary["bounds"] = json!({ "min": min, "max": max });
    }
    summary
}

/// Write a summary of every exported item into the document outputs.
/// Returns how many entries were written.
pub fn record_outputs(doc: &mut Document, manifest: &ExportManifest) -> usize {
    for item in &manifest.items {
        doc.set_output(item.name.clone(), mesh_summary(item));
    }
    manifest.items.len()
}
