//! Common test fixtures for raster overlay tests.
//!
//! Bounding boxes for the usual scenarios plus a builder that writes small
//! single-band GeoTIFFs in memory, with whatever subset of georeferencing
//! tags a test needs.

use std::io::{Cursor, Write};
use std::path::Path;
use tiff::encoder::colortype::{Gray16, Gray32Float};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

pub const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
pub const TAG_MODEL_TIEPOINT: u16 = 33922;
pub const TAG_MODEL_TRANSFORMATION: u16 = 34264;
pub const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
pub const TAG_GDAL_NODATA: u16 = 42113;

/// Common raw bounds, `[west, south, east, north]`.
pub mod bbox {
    /// Full WGS84 extent.
    pub const GLOBAL: [f64; 4] = [-180.0, -90.0, 180.0, 90.0];

    /// Africa and Europe, as a geographic raster would declare it.
    pub const AFRICA_EUROPE: [f64; 4] = [-20.0, -35.0, 55.0, 40.0];

    /// Web Mercator meters spanning zoom-2 tile rows 1 and 2.
    pub const MERCATOR_TILE_BAND: [f64; 4] = [
        -20037508.34,
        -10018754.17,
        20037508.34,
        10018754.17,
    ];

    /// Latitude of the north edge of zoom-2 tile row 1.
    pub const TILE_BAND_LAT: f64 = 66.51326044311186;
}

/// Sample storage for [`GeoTiffBuilder`].
#[derive(Debug, Clone)]
pub enum FixtureSamples {
    F32(Vec<f32>),
    U16(Vec<u16>),
}

/// Builds an in-memory, single-band GeoTIFF.
///
/// ```ignore
/// let bytes = GeoTiffBuilder::f32(100, 100, uniform_grid(100, 100, 5.0))
///     .bounds([-20.0, -35.0, 55.0, 40.0])
///     .geographic_code(4326)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct GeoTiffBuilder {
    width: u32,
    height: u32,
    samples: FixtureSamples,
    bounds: Option<[f64; 4]>,
    use_transformation: bool,
    model_type: Option<u16>,
    geographic_code: Option<u16>,
    projected_code: Option<u16>,
    nodata: Option<String>,
}

impl GeoTiffBuilder {
    pub fn f32(width: u32, height: u32, samples: Vec<f32>) -> Self {
        Self::with_samples(width, height, FixtureSamples::F32(samples))
    }

    pub fn u16(width: u32, height: u32, samples: Vec<u16>) -> Self {
        Self::with_samples(width, height, FixtureSamples::U16(samples))
    }

    fn with_samples(width: u32, height: u32, samples: FixtureSamples) -> Self {
        Self {
            width,
            height,
            samples,
            bounds: None,
            use_transformation: false,
            model_type: None,
            geographic_code: None,
            projected_code: None,
            nodata: None,
        }
    }

    /// Georeference with pixel scale + tiepoint covering `[w, s, e, n]`.
    pub fn bounds(mut self, bounds: [f64; 4]) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Write a ModelTransformation matrix instead of scale + tiepoint.
    pub fn with_transformation(mut self) -> Self {
        self.use_transformation = true;
        self
    }

    pub fn model_type(mut self, value: u16) -> Self {
        self.model_type = Some(value);
        self
    }

    pub fn geographic_code(mut self, code: u16) -> Self {
        self.geographic_code = Some(code);
        self
    }

    pub fn projected_code(mut self, code: u16) -> Self {
        self.projected_code = Some(code);
        self
    }

    /// GDAL_NODATA value, written verbatim as ASCII.
    pub fn nodata(mut self, value: &str) -> Self {
        self.nodata = Some(value.to_string());
        self
    }

    /// Encode to GeoTIFF bytes.
    ///
    /// Panics on encoder failure; fixtures are only used from tests.
    pub fn build(&self) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut cursor).expect("tiff encoder");
            match &self.samples {
                FixtureSamples::F32(data) => {
                    let mut image = encoder
                        .new_image::<Gray32Float>(self.width, self.height)
                        .expect("new f32 image");
                    self.write_geo_tags(image.encoder());
                    image.write_data(data).expect("write f32 data");
                }
                FixtureSamples::U16(data) => {
                    let mut image = encoder
                        .new_image::<Gray16>(self.width, self.height)
                        .expect("new u16 image");
                    self.write_geo_tags(image.encoder());
                    image.write_data(data).expect("write u16 data");
                }
            }
        }
        cursor.into_inner()
    }

    /// Encode and write to a temporary `.tif` file.
    pub fn build_temp_file(&self) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".tif")
            .tempfile()
            .expect("temp file");
        file.write_all(&self.build()).expect("write fixture");
        file.flush().expect("flush fixture");
        file
    }

    /// Encode and write to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) {
        std::fs::write(path, self.build()).expect("write fixture");
    }

    fn write_geo_tags<W: std::io::Write + std::io::Seek, K: tiff::encoder::TiffKind>(
        &self,
        dir: &mut tiff::encoder::DirectoryEncoder<W, K>,
    ) {
        if let Some([west, south, east, north]) = self.bounds {
            let scale_x = (east - west) / self.width as f64;
            let scale_y = (north - south) / self.height as f64;

            if self.use_transformation {
                let matrix = [
                    scale_x, 0.0, 0.0, west, //
                    0.0, -scale_y, 0.0, north, //
                    0.0, 0.0, 0.0, 0.0, //
                    0.0, 0.0, 0.0, 1.0,
                ];
                dir.write_tag(Tag::Unknown(TAG_MODEL_TRANSFORMATION), &matrix[..])
                    .expect("transformation tag");
            } else {
                let pixel_scale = [scale_x, scale_y, 0.0];
                dir.write_tag(Tag::Unknown(TAG_MODEL_PIXEL_SCALE), &pixel_scale[..])
                    .expect("pixel scale tag");
                let tiepoint = [0.0, 0.0, 0.0, west, north, 0.0];
                dir.write_tag(Tag::Unknown(TAG_MODEL_TIEPOINT), &tiepoint[..])
                    .expect("tiepoint tag");
            }
        }

        let keys = self.geokey_directory();
        if !keys.is_empty() {
            dir.write_tag(Tag::Unknown(TAG_GEO_KEY_DIRECTORY), &keys[..])
                .expect("geokey directory tag");
        }

        if let Some(nodata) = &self.nodata {
            dir.write_tag(Tag::Unknown(TAG_GDAL_NODATA), nodata.as_str())
                .expect("nodata tag");
        }
    }

    fn geokey_directory(&self) -> Vec<u16> {
        let entries: Vec<(u16, u16)> = [
            (1024, self.model_type),
            (2048, self.geographic_code),
            (3072, self.projected_code),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

        if entries.is_empty() {
            return Vec::new();
        }

        let mut keys = vec![1, 1, 0, entries.len() as u16];
        for (key, value) in entries {
            keys.extend_from_slice(&[key, 0, 1, value]);
        }
        keys
    }
}
