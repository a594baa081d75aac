use crate::config::model::{AssetsRange, LayerDef};

/// Names that already carry their own location and are used verbatim.
fn is_rooted(name: &str) -> bool {
    name.starts_with("./")
        || name.starts_with('/')
        || name.starts_with("http:")
        || name.starts_with("https:")
}

pub(crate) fn join_base(base: &str, name: &str) -> String {
    if is_rooted(name) {
        return name.to_string();
    }
    join_segments(&[base, name])
}

pub(crate) fn join_folder(base: &str, folder: &str, name: &str) -> String {
    if is_rooted(name) {
        return name.to_string();
    }
    join_segments(&[base, folder, name])
}

fn join_segments(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `base + zero-padded(i) + ext` for every `i` in `from..=to`.
pub(crate) fn expand_range(r: &AssetsRange) -> Vec<String> {
    (r.from..=r.to)
        .map(|i| format!("{}{:0pad$}{}", r.base, i, r.ext, pad = r.pad))
        .collect()
}

/// Logical paths of every asset a layer references.
///
/// Themed layers live under the tier's theme folder, layers with `assetsFolder` under that
/// folder, everything else directly under `base`.
pub(crate) fn layer_asset_paths(layer: &LayerDef, base: &str, theme_folder: &str) -> Vec<String> {
    let names = match &layer.assets_range {
        Some(r) => expand_range(r),
        None => layer.assets.clone(),
    };
    let folder = if layer.theme {
        Some(theme_folder)
    } else {
        layer.assets_folder.as_deref()
    };
    names
        .iter()
        .map(|n| match folder {
            Some(f) => join_folder(base, f, n),
            None => join_base(base, n),
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/paths.rs"]
mod tests;
