//! Camera: named collection of detectors

use std::collections::HashMap;

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::Box2D;
use crate::camera_geom::model::detector::Detector;

/// Detectors keyed by unique name, iterated in insertion order.
#[derive(Debug, Clone)]
pub struct Camera {
    name: String,
    detectors: Vec<Detector>,
    index: HashMap<String, usize>,
}

impl Camera {
    pub fn new(name: impl Into<String>, detectors: Vec<Detector>) -> Result<Self> {
        let mut index = HashMap::with_capacity(detectors.len());
        for (i, det) in detectors.iter().enumerate() {
            if index.insert(det.name().to_string(), i).is_some() {
                return Err(CameraGeomError::DuplicateDetectorError(det.name().to_string()));
            }
        }
        Ok(Self {
            name: name.into(),
            detectors,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Detector> {
        self.index.get(name).map(|&i| &self.detectors[i])
    }

    /// Detector by name, or `UnknownDetectorError`.
    pub fn detector(&self, name: &str) -> Result<&Detector> {
        self.get(name)
            .ok_or_else(|| CameraGeomError::UnknownDetectorError(name.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detector> {
        self.detectors.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.iter().map(Detector::name)
    }

    /// The named detectors in the given order, or every detector when `names` is `None`.
    pub fn select<S: AsRef<str>>(&self, names: Option<&[S]>) -> Result<Vec<&Detector>> {
        match names {
            None => Ok(self.detectors.iter().collect()),
            Some(names) => names.iter().map(|name| self.detector(name.as_ref())).collect(),
        }
    }

    /// Focal-plane box (mm) enclosing every detector corner.
    pub fn fp_bbox(&self) -> Box2D {
        self.detectors
            .iter()
            .fold(Box2D::empty(), |acc, det| acc.include_box(&det.fp_bbox()))
    }
}

impl<'a> IntoIterator for &'a Camera {
    type Item = &'a Detector;
    type IntoIter = std::slice::Iter<'a, Detector>;

    fn into_iter(self) -> Self::IntoIter {
        self.detectors.iter()
    }
}
