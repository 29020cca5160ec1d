//! Screen density buckets and the resource directories named after them.

use std::path::{Path, PathBuf};

/// First platform version with adaptive icons. Below it, the anydpi
/// directory needs an explicit `-v26` qualifier.
pub const ANDROID_OREO: u32 = 26;

/// A density qualifier and the factor it scales logical sizes by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub qualifier: &'static str,
    pub multiplier: f32,
}

/// Every density an adaptive overlay is rendered at, smallest first.
pub const DENSITIES: [Density; 6] = [
    Density { qualifier: "ldpi", multiplier: 0.75 },
    Density { qualifier: "mdpi", multiplier: 1.0 },
    Density { qualifier: "hdpi", multiplier: 1.5 },
    Density { qualifier: "xhdpi", multiplier: 2.0 },
    Density { qualifier: "xxhdpi", multiplier: 3.0 },
    Density { qualifier: "xxxhdpi", multiplier: 4.0 },
];

/// Base name generated directories are derived from.
///
/// Icons are expected to live in an unqualified directory such as
/// `drawable` or `mipmap`. Icons found in an already qualified one
/// (`mipmap-anydpi-v26`, `drawable-xhdpi`) would otherwise produce names
/// like `mipmap-anydpi-v26-xhdpi`, so any directory name containing `-v2`
/// or `dpi` collapses to plain `drawable`. Only those two substrings are
/// recognized.
pub fn normalized_dir_name(dir: &Path) -> &str {
    let name = dir.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    if name.contains("-v2") || name.contains("dpi") {
        "drawable"
    } else {
        name
    }
}

/// Sibling of `drawable_root` for one density, e.g. `res/mipmap-xhdpi`.
pub fn qualified_dir(drawable_root: &Path, qualifier: &str) -> PathBuf {
    sibling(drawable_root, &format!("{}-{qualifier}", normalized_dir_name(drawable_root)))
}

/// Density-independent sibling of `drawable_root` holding layer lists,
/// e.g. `res/mipmap-anydpi` or `res/mipmap-anydpi-v26`.
pub fn anydpi_dir(drawable_root: &Path, min_sdk_version: u32) -> PathBuf {
    let suffix = if min_sdk_version >= ANDROID_OREO { "" } else { "-v26" };
    sibling(
        drawable_root,
        &format!("{}-anydpi{suffix}", normalized_dir_name(drawable_root)),
    )
}

fn sibling(dir: &Path, name: &str) -> PathBuf {
    match dir.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_ordered_and_fixed() {
        let qualifiers: Vec<_> = DENSITIES.iter().map(|d| d.qualifier).collect();
        assert_eq!(qualifiers, ["ldpi", "mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"]);
        assert_eq!(DENSITIES[3].multiplier, 2.0);
        assert_eq!(DENSITIES[0].multiplier, 0.75);
    }

    #[test]
    fn qualified_names_collapse_to_drawable() {
        assert_eq!(normalized_dir_name(Path::new("res/mipmap")), "mipmap");
        assert_eq!(normalized_dir_name(Path::new("res/drawable")), "drawable");
        assert_eq!(normalized_dir_name(Path::new("res/mipmap-anydpi-v26")), "drawable");
        assert_eq!(normalized_dir_name(Path::new("res/drawable-v24")), "drawable");
        assert_eq!(normalized_dir_name(Path::new("res/mipmap-xhdpi")), "drawable");
        assert_eq!(normalized_dir_name(Path::new("res/mipmap-night")), "mipmap-night");
    }

    #[test]
    fn density_dirs_are_siblings() {
        let root = Path::new("build/debug/res/mipmap");
        assert_eq!(qualified_dir(root, "xhdpi"), Path::new("build/debug/res/mipmap-xhdpi"));

        let odd = Path::new("build/debug/res/mipmap-anydpi-v26");
        assert_eq!(qualified_dir(odd, "hdpi"), Path::new("build/debug/res/drawable-hdpi"));
    }

    #[test]
    fn anydpi_suffix_depends_on_min_sdk() {
        let root = Path::new("res/mipmap");
        assert_eq!(anydpi_dir(root, 21), Path::new("res/mipmap-anydpi-v26"));
        assert_eq!(anydpi_dir(root, 25), Path::new("res/mipmap-anydpi-v26"));
        assert_eq!(anydpi_dir(root, 26), Path::new("res/mipmap-anydpi"));
        assert_eq!(anydpi_dir(root, 34), Path::new("res/mipmap-anydpi"));
    }
}
