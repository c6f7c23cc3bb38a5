//! Array simplification shared by all adapters.

use specload_model::{Component, DataFile};

/// Squeeze length-1 axes out of multi-dimensional shapes.
///
/// Datasets, component names and origins are unchanged; a shape made only of
/// length-1 axes collapses to `[1]`.
pub fn simplify_arrays(file: DataFile) -> DataFile {
    file.map_components(squeeze)
}

fn squeeze(component: Component) -> Component {
    if component.shape().len() < 2 {
        return component;
    }
    let mut shape: Vec<usize> = component.shape().iter().copied().filter(|&n| n != 1).collect();
    if shape.is_empty() {
        shape.push(1);
    }
    if shape.len() == component.shape().len() {
        return component;
    }
    tracing::trace!(
        component = component.name(),
        from = %component.shape_label(),
        "squeezed length-1 axes"
    );
    component.with_shape(shape)
}
