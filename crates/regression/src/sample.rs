use derive_more::{From, Into};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint<Input, Output> {
    pub x: Input,
    pub y: Output,
}

/// Ordered (x, y) pairs, stored in single precision.
///
/// A sample is never mutated in place; the scaling helpers return a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, From, Into)]
#[serde(transparent)]
pub struct Sample(Vec<DataPoint<f32, f32>>);

impl Sample {
    pub fn new(points: Vec<DataPoint<f32, f32>>) -> Self {
        Sample(points)
    }

    pub fn from_pairs<I: IntoIterator<Item = (f32, f32)>>(pairs: I) -> Self {
        pairs.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[DataPoint<f32, f32>] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint<f32, f32>> {
        self.0.iter()
    }

    pub fn x_values(&self) -> Vec<f32> {
        self.0.iter().map(|p| p.x).collect()
    }

    pub fn y_values(&self) -> Vec<f32> {
        self.0.iter().map(|p| p.y).collect()
    }

    /// Smallest and largest x, `None` for an empty sample.
    ///
    /// NaN coordinates are skipped.
    pub fn x_range(&self) -> Option<(f32, f32)> {
        self.0.iter().map(|p| p.x).filter(|x| !x.is_nan()).fold(None, |range, x| match range {
            None => Some((x, x)),
            Some((min, max)) => Some((min.min(x), max.max(x))),
        })
    }

    pub fn scale_x(&self, factor: f32) -> Sample {
        self.0.iter().map(|p| (p.x * factor, p.y)).collect()
    }

    pub fn scale_y(&self, factor: f32) -> Sample {
        self.0.iter().map(|p| (p.x, p.y * factor)).collect()
    }
}

impl FromIterator<(f32, f32)> for Sample {
    fn from_iter<I: IntoIterator<Item = (f32, f32)>>(iter: I) -> Self {
        Sample(iter.into_iter().map(|(x, y)| DataPoint { x, y }).collect())
    }
}

impl<'a> IntoIterator for &'a Sample {
    type Item = &'a DataPoint<f32, f32>;
    type IntoIter = std::slice::Iter<'a, DataPoint<f32, f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
