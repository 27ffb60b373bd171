//! GeoTIFF decoding.
//!
//! Reads the first image of a TIFF, keeps band 0 as `f32`, and pulls the
//! georeferencing tags the overlay engine needs:
//!
//! | Tag   | Name                | Used for                         |
//! |-------|---------------------|----------------------------------|
//! | 33550 | ModelPixelScale     | bounds (with tiepoint)           |
//! | 33922 | ModelTiepoint       | bounds (with pixel scale)        |
//! | 34264 | ModelTransformation | bounds when no scale/tiepoint    |
//! | 34735 | GeoKeyDirectory     | model type, EPSG codes           |
//! | 42113 | GDAL_NODATA         | declared no-data value           |

use crate::error::{Result, SourceError};
use crate::types::{CrsHints, DecodedRaster};
use geo_common::ModelType;
use std::io::{Read, Seek};
use std::sync::Arc;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
const TAG_MODEL_TIEPOINT: u16 = 33922;
const TAG_MODEL_TRANSFORMATION: u16 = 34264;
const TAG_GEO_KEY_DIRECTORY: u16 = 34735;
const TAG_GDAL_NODATA: u16 = 42113;

const GEOKEY_MODEL_TYPE: u16 = 1024;
const GEOKEY_GEOGRAPHIC_TYPE: u16 = 2048;
const GEOKEY_PROJECTED_CS_TYPE: u16 = 3072;

/// Upper bound on decoded buffers (1 GiB).
const MAX_DECODE_BYTES: usize = 1024 * 1024 * 1024;

/// Decode GeoTIFF bytes into a [`DecodedRaster`].
///
/// This is CPU-bound; async callers should run it on the blocking pool.
pub fn decode_geotiff(bytes: &[u8]) -> Result<DecodedRaster> {
    let mut limits = Limits::default();
    limits.decoding_buffer_size = MAX_DECODE_BYTES;
    limits.intermediate_buffer_size = MAX_DECODE_BYTES;

    let mut decoder = Decoder::new(std::io::Cursor::new(bytes))?.with_limits(limits);

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Err(SourceError::invalid_raster(format!(
            "image has zero extent ({}x{})",
            width, height
        )));
    }

    let raw_bounds = read_raw_bounds(&mut decoder, width, height)?;
    let hints = read_crs_hints(&mut decoder)?;
    let nodata = read_gdal_nodata(&mut decoder)?;

    let all_bands = to_f32(decoder.read_image()?);
    let samples = first_band(all_bands, width * height)?;

    Ok(DecodedRaster {
        width,
        height,
        samples: Arc::new(samples),
        raw_bounds,
        hints,
        nodata,
    })
}

fn to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U16(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U32(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::U64(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I8(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I16(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I32(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::I64(values) => values.iter().map(|&v| v as f32).collect(),
        DecodingResult::F32(values) => values,
        DecodingResult::F64(values) => values.iter().map(|&v| v as f32).collect(),
    }
}

/// Keep band 0 of pixel-interleaved samples.
fn first_band(samples: Vec<f32>, pixels: usize) -> Result<Vec<f32>> {
    let bands = samples.len() / pixels;
    match bands {
        0 => Err(SourceError::invalid_raster(format!(
            "expected at least {} samples, decoded {}",
            pixels,
            samples.len()
        ))),
        1 => {
            let mut samples = samples;
            samples.truncate(pixels);
            Ok(samples)
        }
        n => Ok(samples.into_iter().step_by(n).take(pixels).collect()),
    }
}

fn find_f64_vec<R: Read + Seek>(decoder: &mut Decoder<R>, code: u16) -> Result<Option<Vec<f64>>> {
    match decoder.find_tag(Tag::from_u16_exhaustive(code))? {
        Some(value) => Ok(Some(value.into_f64_vec()?)),
        None => Ok(None),
    }
}

/// `[west, south, east, north]` from scale + tiepoint, or from the affine
/// transformation matrix when those are absent.
fn read_raw_bounds<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    width: usize,
    height: usize,
) -> Result<Option<Vec<f64>>> {
    let (w, h) = (width as f64, height as f64);

    let scale = find_f64_vec(decoder, TAG_MODEL_PIXEL_SCALE)?;
    let tiepoint = find_f64_vec(decoder, TAG_MODEL_TIEPOINT)?;

    if let (Some(scale), Some(tie)) = (&scale, &tiepoint) {
        if scale.len() >= 2 && tie.len() >= 6 {
            let (sx, sy) = (scale[0], scale[1]);
            let (i, j, x, y) = (tie[0], tie[1], tie[3], tie[4]);
            let west = x - i * sx;
            let north = y + j * sy;
            return Ok(Some(vec![west, north - h * sy, west + w * sx, north]));
        }
    }

    if let Some(m) = find_f64_vec(decoder, TAG_MODEL_TRANSFORMATION)? {
        if m.len() >= 8 {
            let project = |col: f64, row: f64| (m[0] * col + m[1] * row + m[3], m[4] * col + m[5] * row + m[7]);
            let corners = [project(0.0, 0.0), project(w, 0.0), project(w, h), project(0.0, h)];

            let (mut west, mut south) = (f64::INFINITY, f64::INFINITY);
            let (mut east, mut north) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for (x, y) in corners {
                west = west.min(x);
                east = east.max(x);
                south = south.min(y);
                north = north.max(y);
            }
            return Ok(Some(vec![west, south, east, north]));
        }
    }

    Ok(None)
}

/// Read the directly-stored GeoKeys that identify the CRS.
fn read_crs_hints<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<CrsHints> {
    let keys = match decoder.find_tag(Tag::from_u16_exhaustive(TAG_GEO_KEY_DIRECTORY))? {
        Some(value) => value.into_u16_vec()?,
        None => return Ok(CrsHints::default()),
    };

    Ok(parse_geokeys(&keys))
}

/// Parse a GeoKeyDirectory: a 4-value header followed by
/// `(key, location, count, value)` entries. Only entries with location 0
/// carry their value inline, which is where these keys live.
pub(crate) fn parse_geokeys(keys: &[u16]) -> CrsHints {
    let mut hints = CrsHints::default();
    if keys.len() < 4 {
        return hints;
    }

    let declared = keys[3] as usize;
    for entry in keys[4..].chunks_exact(4).take(declared) {
        let (key, location, value) = (entry[0], entry[1], entry[3]);
        if location != 0 {
            continue;
        }
        match key {
            GEOKEY_MODEL_TYPE => hints.model_type = ModelType::from_geokey(value),
            GEOKEY_GEOGRAPHIC_TYPE => hints.geographic_code = Some(value),
            GEOKEY_PROJECTED_CS_TYPE => hints.projected_code = Some(value),
            _ => {}
        }
    }

    hints
}

fn read_gdal_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Result<Option<f64>> {
    let text = match decoder.find_tag(Tag::from_u16_exhaustive(TAG_GDAL_NODATA))? {
        Some(value) => value.into_string()?,
        None => return Ok(None),
    };

    Ok(text.trim_matches(|c: char| c.is_whitespace() || c == '\0').parse().ok())
}
