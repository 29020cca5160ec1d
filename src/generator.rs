//! Applies a variant's filters to icons and writes the results.
//!
//! Legacy icons are decoded, decorated and re-encoded in place of the
//! output. Adaptive icons are left alone: every filter is rendered onto its
//! own transparent canvas at every density, and a layer list stacking those
//! overlays over a copy of the original icon replaces the output.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::canvas::Canvas;
use crate::density::{anydpi_dir, normalized_dir_name, qualified_dir, Density, ANDROID_OREO, DENSITIES};
use crate::error::Result;
use crate::filter::{Filter, FilterEffect};
use crate::icon::AdaptiveSize;
use crate::manifest::LayerManifest;

// ============================================================================
// Jobs and outputs
// ============================================================================

/// One icon to generate.
#[derive(Debug, Clone, PartialEq)]
pub enum IconJob {
    /// A raster icon decorated in place.
    Raster {
        name: String,
        source: PathBuf,
        output: PathBuf,
        /// Treat the raster as an adaptive layer with an inset viewport.
        adaptive: bool,
    },
    /// An adaptive icon description, decorated through extra layers.
    Adaptive {
        name: String,
        source: PathBuf,
        output: PathBuf,
        size: AdaptiveSize,
    },
}

impl IconJob {
    pub fn name(&self) -> &str {
        match self {
            IconJob::Raster { name, .. } | IconJob::Adaptive { name, .. } => name,
        }
    }
}

/// Files written for an adaptive icon.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveOutput {
    /// Overlay PNGs, grouped by filter then ordered by density.
    pub overlays: Vec<PathBuf>,
    /// Copy of the source description referenced as the bottom layer.
    pub base_copy: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: LayerManifest,
}

/// What a finished [`IconJob`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum IconOutput {
    Raster(PathBuf),
    Adaptive(AdaptiveOutput),
}

// ============================================================================
// IconGenerator
// ============================================================================

/// Runs one variant's ordered filter list over icons.
///
/// # Example
///
/// ```no_run
/// use easylauncher::{ColorRibbonConfig, IconGenerator};
///
/// let generator = IconGenerator::new(vec![ColorRibbonConfig::new("beta").into()]);
/// generator.transform_raster(
///     "res/mipmap-xhdpi/ic_launcher.png".as_ref(),
///     "build/beta/res/mipmap-xhdpi/ic_launcher.png".as_ref(),
///     false,
/// )?;
/// # Ok::<(), easylauncher::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct IconGenerator {
    filters: Vec<Filter>,
    min_sdk_version: u32,
}

impl IconGenerator {
    /// Creates a generator targeting platforms with adaptive icon support.
    pub fn new(filters: Vec<Filter>) -> Self {
        Self {
            filters,
            min_sdk_version: ANDROID_OREO,
        }
    }

    /// Sets the lowest platform version the output must support.
    pub fn with_min_sdk_version(mut self, version: u32) -> Self {
        self.min_sdk_version = version;
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn min_sdk_version(&self) -> u32 {
        self.min_sdk_version
    }

    /// Decorates the raster at `source` with every filter, in order, and
    /// writes a PNG to `output`.
    pub fn transform_raster(&self, source: &Path, output: &Path, adaptive: bool) -> Result<()> {
        let mut canvas = Canvas::open(source)?;
        for filter in &self.filters {
            filter.apply(&mut canvas, adaptive);
        }
        canvas.save_png(output)?;
        debug!("wrote {}", output.display());
        Ok(())
    }

    /// Renders every filter as a separate layer for the adaptive icon at
    /// `source` and replaces `output` with a layer list.
    ///
    /// Errors carry the output file stem as the icon name.
    pub fn transform_adaptive(&self, source: &Path, output: &Path, size: AdaptiveSize) -> Result<AdaptiveOutput> {
        let name = file_stem(output);
        self.adaptive(&name, source, output, size)
    }

    /// Generates one icon, attaching the job name to any error.
    pub fn generate(&self, job: &IconJob) -> Result<IconOutput> {
        let output = match job {
            IconJob::Raster {
                name,
                source,
                output,
                adaptive,
            } => {
                self.transform_raster(source, output, *adaptive)
                    .map_err(|err| err.in_task(name.as_str(), None, None))?;
                IconOutput::Raster(output.clone())
            }
            IconJob::Adaptive {
                name,
                source,
                output,
                size,
            } => IconOutput::Adaptive(self.adaptive(name, source, output, *size)?),
        };
        info!(
            "generated `{}` with {} filter(s)",
            job.name(),
            self.filters.len()
        );
        Ok(output)
    }

    /// Generates many icons in parallel.
    ///
    /// Results come back in job order; a failed job does not affect the
    /// others.
    pub fn generate_all(&self, jobs: &[IconJob]) -> Vec<Result<IconOutput>> {
        jobs.par_iter().map(|job| self.generate(job)).collect()
    }

    fn adaptive(&self, name: &str, source: &Path, output: &Path, size: AdaptiveSize) -> Result<AdaptiveOutput> {
        let drawable_root = output.parent().unwrap_or_else(|| Path::new(""));
        let output_stem = file_stem(output);

        let resource_names: Vec<String> = self
            .filters
            .iter()
            .enumerate()
            .map(|(index, filter)| format!("{}_{output_stem}", filter.identifier(index)))
            .collect();

        let tasks: Vec<(usize, &Filter, Density)> = self
            .filters
            .iter()
            .enumerate()
            .flat_map(|(index, filter)| DENSITIES.iter().map(move |density| (index, filter, *density)))
            .collect();

        // Every overlay is written before the layer list referencing them.
        let overlays = tasks
            .par_iter()
            .map(|&(index, filter, density)| {
                let path = qualified_dir(drawable_root, density.qualifier)
                    .join(format!("{}.png", resource_names[index]));
                render_overlay(filter, size, density, &path)
                    .map(|()| path)
                    .map_err(|err| err.in_task(name, Some(index), Some(density.qualifier)))
            })
            .collect::<Result<Vec<PathBuf>>>()?;

        let layer_dir = anydpi_dir(drawable_root, self.min_sdk_version);
        let source_name = source
            .file_name()
            .map(|file| file.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_copy = layer_dir.join(format!("easy_{source_name}"));
        let manifest_path = layer_dir.join(output.file_name().unwrap_or_default());

        let mut manifest = LayerManifest::new(format!("@drawable/easy_{}", file_stem(source)));
        let reference_dir = normalized_dir_name(drawable_root);
        for resource_name in &resource_names {
            manifest.push(format!("@{reference_dir}/{resource_name}"));
        }

        write_layer_list(source, &base_copy, &manifest, &manifest_path)
            .map_err(|err| err.in_task(name, None, None))?;
        debug!(
            "wrote {} with {} layer(s)",
            manifest_path.display(),
            manifest.len()
        );

        Ok(AdaptiveOutput {
            overlays,
            base_copy,
            manifest_path,
            manifest,
        })
    }
}

fn render_overlay(filter: &Filter, size: AdaptiveSize, density: Density, path: &Path) -> Result<()> {
    let mut canvas = Canvas::with_size(size.at_density(density.multiplier))?;
    filter.apply(&mut canvas, true);
    canvas.save_png(path)?;
    debug!("wrote {}", path.display());
    Ok(())
}

fn write_layer_list(source: &Path, base_copy: &Path, manifest: &LayerManifest, manifest_path: &Path) -> Result<()> {
    if let Some(dir) = base_copy.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::copy(source, base_copy)?;
    manifest.write(manifest_path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl From<Vec<Filter>> for IconGenerator {
    fn from(filters: Vec<Filter>) -> Self {
        Self::new(filters)
    }
}

impl Default for IconGenerator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::filter::{ChromeLikeConfig, ColorRibbonConfig, OverlayConfig};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    const VECTOR: &str = r#"<vector xmlns:android="http://schemas.android.com/apk/res/android"
    android:width="108dp" android:height="108dp"
    android:viewportWidth="108" android:viewportHeight="108" />
"#;

    fn ribbon_filters() -> Vec<Filter> {
        vec![
            ChromeLikeConfig::new("beta").into(),
            ColorRibbonConfig::new("beta").into(),
        ]
    }

    fn adaptive_fixture() -> (TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("src/res/mipmap/ic_launcher.xml");
        fs::create_dir_all(source.parent().unwrap()).unwrap();
        fs::write(&source, VECTOR).unwrap();
        let output = dir.path().join("build/res/mipmap/ic_launcher.xml");
        (dir, source, output)
    }

    fn raster_fixture(dir: &TempDir, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join("src/res/mipmap-xhdpi/ic_launcher.png");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(width, height, Rgba([20, 120, 200, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test_log::test]
    fn adaptive_writes_every_density() {
        let (dir, source, output) = adaptive_fixture();
        let generator = IconGenerator::new(ribbon_filters());
        let result = generator
            .transform_adaptive(&source, &output, AdaptiveSize::new(108.0, 108.0))
            .unwrap();

        assert_eq!(result.overlays.len(), 2 * DENSITIES.len());
        let res = dir.path().join("build/res");
        let xhdpi = res.join("mipmap-xhdpi/chromelikefilter_0_ic_launcher.png");
        assert!(result.overlays.contains(&xhdpi));

        let canvas = Canvas::open(&xhdpi).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (216, 216));
        let ldpi = Canvas::open(res.join("mipmap-ldpi/colorribbonfilter_1_ic_launcher.png")).unwrap();
        assert_eq!((ldpi.width(), ldpi.height()), (81, 81));

        for filter in ["chromelikefilter_0", "colorribbonfilter_1"] {
            let written = DENSITIES
                .iter()
                .filter(|d| {
                    res.join(format!("mipmap-{}/{filter}_ic_launcher.png", d.qualifier))
                        .is_file()
                })
                .count();
            assert_eq!(written, 6);
        }
    }

    #[test_log::test]
    fn manifest_lists_base_then_filters() {
        let (dir, source, output) = adaptive_fixture();
        let generator = IconGenerator::new(ribbon_filters()).with_min_sdk_version(21);
        let result = generator
            .transform_adaptive(&source, &output, AdaptiveSize::new(108.0, 108.0))
            .unwrap();

        let anydpi = dir.path().join("build/res/mipmap-anydpi-v26");
        assert_eq!(result.manifest_path, anydpi.join("ic_launcher.xml"));
        assert_eq!(result.base_copy, anydpi.join("easy_ic_launcher.xml"));
        assert_eq!(fs::read_to_string(&result.base_copy).unwrap(), VECTOR);
        assert_eq!(
            result.manifest.layers(),
            [
                "@drawable/easy_ic_launcher",
                "@mipmap/chromelikefilter_0_ic_launcher",
                "@mipmap/colorribbonfilter_1_ic_launcher",
            ]
        );
        assert_eq!(result.manifest.len(), 1 + generator.filters().len());

        let xml = fs::read_to_string(&result.manifest_path).unwrap();
        assert_eq!(xml, result.manifest.to_xml().unwrap());
    }

    #[test_log::test]
    fn qualified_output_dir_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("ic_launcher.xml");
        fs::write(&source, VECTOR).unwrap();
        let output = dir.path().join("res/mipmap-anydpi-v26/ic_launcher.xml");

        let result = IconGenerator::new(vec![ColorRibbonConfig::new("qa").into()])
            .transform_adaptive(&source, &output, AdaptiveSize::new(108.0, 108.0))
            .unwrap();

        let res = dir.path().join("res");
        assert!(res.join("drawable-hdpi/colorribbonfilter_0_ic_launcher.png").is_file());
        assert_eq!(result.manifest_path, res.join("drawable-anydpi/ic_launcher.xml"));
        assert_eq!(result.manifest.layers()[1], "@drawable/colorribbonfilter_0_ic_launcher");
    }

    #[test_log::test]
    fn raster_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let source = raster_fixture(&dir, 96, 80);
        let output = dir.path().join("build/res/mipmap-xhdpi/ic_launcher.png");

        IconGenerator::new(ribbon_filters())
            .transform_raster(&source, &output, false)
            .unwrap();

        let decoded = Canvas::open(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (96, 80));
        assert_ne!(decoded, Canvas::open(&source).unwrap());
    }

    #[test_log::test]
    fn failed_job_does_not_affect_others() {
        let dir = tempfile::tempdir().unwrap();
        let source = raster_fixture(&dir, 48, 48);
        let jobs = vec![
            IconJob::Raster {
                name: "missing".into(),
                source: dir.path().join("nope.png"),
                output: dir.path().join("out/missing.png"),
                adaptive: false,
            },
            IconJob::Raster {
                name: "ic_launcher".into(),
                source,
                output: dir.path().join("out/ic_launcher.png"),
                adaptive: false,
            },
        ];

        let generator = IconGenerator::new(ribbon_filters());
        let results = generator.generate_all(&jobs);

        assert_eq!(results.len(), 2);
        let err = results[0].as_ref().unwrap_err();
        assert!(matches!(err, Error::Generation { icon, .. } if icon == "missing"));
        assert!(err.to_string().starts_with("failed to generate `missing`"));
        assert_eq!(
            results[1].as_ref().unwrap(),
            &IconOutput::Raster(dir.path().join("out/ic_launcher.png"))
        );
        assert!(dir.path().join("out/ic_launcher.png").is_file());
    }

    #[test_log::test]
    fn adaptive_task_errors_name_filter_and_density() {
        let (dir, source, _) = adaptive_fixture();
        // A regular file where the density directory should go.
        let blocker = dir.path().join("build/res/mipmap-ldpi");
        fs::create_dir_all(blocker.parent().unwrap()).unwrap();
        fs::write(&blocker, b"").unwrap();

        let job = IconJob::Adaptive {
            name: "ic_launcher".into(),
            source,
            output: dir.path().join("build/res/mipmap/ic_launcher.xml"),
            size: AdaptiveSize::new(108.0, 108.0),
        };
        let err = IconGenerator::new(vec![OverlayConfig::new("missing.png").into()])
            .generate(&job)
            .unwrap_err();

        match err {
            Error::Generation {
                icon,
                filter,
                density,
                ..
            } => {
                assert_eq!(icon, "ic_launcher");
                assert_eq!(filter, Some(0));
                assert_eq!(density, Some("ldpi"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!dir.path().join("build/res/mipmap-anydpi/ic_launcher.xml").exists());
    }

    #[test_log::test]
    fn no_filters_still_writes_a_layer_list() {
        let (_dir, source, output) = adaptive_fixture();
        let result = IconGenerator::default()
            .transform_adaptive(&source, &output, AdaptiveSize::new(108.0, 108.0))
            .unwrap();
        assert!(result.overlays.is_empty());
        assert_eq!(result.manifest.layers(), ["@drawable/easy_ic_launcher"]);
    }
}
